use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context};
use clap::Parser;
use client_core::{load_settings, AnalyzerApi, AnalyzerClient};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::controller::events::UiEvent;
use crate::ui::{
    theme::{PersistedDesktopSettings, SETTINGS_STORAGE_KEY},
    AnalyzerApp, StartupConfig,
};

const APP_NAME: &str = "ATS Resume Analyzer";

#[derive(Debug, Parser)]
#[command(name = "resume-analyzer-gui", about = "Desktop client for the resume analysis service")]
struct Args {
    /// Analysis service base URL, including the `/api` prefix.
    #[arg(long)]
    api_url: Option<String>,
    /// Directory that "Download Report" writes into.
    #[arg(long)]
    report_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut settings = load_settings();
    if let Some(dir) = args.report_dir {
        settings.report_dir = Some(dir);
    }

    let client = AnalyzerClient::from_settings(&settings, args.api_url.as_deref())
        .context("invalid analysis service URL")?;
    let startup = StartupConfig {
        api_base_url: client.base_url().to_string(),
        report_dir: settings.report_output_dir(),
    };
    tracing::info!(
        api = %startup.api_base_url,
        environment = ?settings.environment,
        report_dir = %startup.report_dir.display(),
        "starting desktop client"
    );
    let api: Arc<dyn AnalyzerApi> = Arc::new(client);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let _worker = runtime::launch(api, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([720.0, 520.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        APP_NAME,
        options,
        Box::new(|cc| {
            let persisted_settings = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| PersistedDesktopSettings::from_storage_text(&text))
            });
            Ok(Box::new(AnalyzerApp::new(
                cmd_tx,
                ui_rx,
                persisted_settings,
                startup,
            )))
        }),
    )
    .map_err(|err| anyhow!("{err}"))
}
