//! Application shell: owns the controller state and the backend channels,
//! turns panel actions into transitions, and drives the frame loop.

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use arboard::Clipboard;
use chrono::{Local, Utc};
use client_core::report::report_file_name;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::JobId;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent,
    orchestration::dispatch_backend_commands,
    reducer::{AppState, FileCandidate, ToastKind},
};
use crate::ui::panels;
use crate::ui::theme::{
    scaled_text_styles, visuals_for_theme, PersistedDesktopSettings, SETTINGS_STORAGE_KEY,
};
use crate::ui::widgets::show_toast;

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub api_base_url: String,
    pub report_dir: PathBuf,
}

/// Intent emitted by a panel during rendering, applied after the frame's
/// layout pass.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    PickFile,
    SelectJob(Option<JobId>),
    SetCustomDescription(String),
    Submit,
    Reset,
    ToggleHistory,
    DownloadReport,
    SaveReportAs,
    CopyReport,
    ToggleTheme,
}

pub struct AnalyzerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: AppState,
    startup: StartupConfig,
    settings: PersistedDesktopSettings,
    applied_settings: Option<PersistedDesktopSettings>,
    mounted: bool,
}

impl AnalyzerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted_settings: Option<PersistedDesktopSettings>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state: AppState::new(),
            startup,
            settings: persisted_settings.unwrap_or_default(),
            applied_settings: None,
            mounted: false,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn dispatch(&mut self, commands: Vec<BackendCommand>, now: Instant) {
        dispatch_backend_commands(&self.cmd_tx, commands, &mut self.state, now);
    }

    fn mount_once(&mut self, now: Instant) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        tracing::info!(api = %self.startup.api_base_url, "loading job positions");
        let commands = self.state.on_mount();
        self.dispatch(commands, now);
    }

    fn process_ui_events(&mut self, now: Instant) {
        while let Ok(event) = self.ui_rx.try_recv() {
            let commands = self.state.apply(event, now);
            self.dispatch(commands, now);
        }
    }

    fn process_dropped_files(&mut self, ctx: &egui::Context, now: Instant) {
        let dropped = ctx.input(|input| input.raw.dropped_files.clone());
        let Some(path) = dropped.into_iter().rev().find_map(|file| file.path) else {
            return;
        };
        if self.state.is_loading() {
            tracing::debug!(path = %path.display(), "ignoring drop while analysis is running");
            return;
        }
        self.stage_file(&path, now);
    }

    fn stage_file(&mut self, path: &Path, now: Instant) {
        self.state.select_file(FileCandidate::from_path(path), now);
    }

    pub fn handle_action(&mut self, action: UiAction, now: Instant) {
        match action {
            UiAction::PickFile => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("PDF", &["pdf"])
                    .pick_file()
                {
                    self.stage_file(&path, now);
                }
            }
            UiAction::SelectJob(job_id) => self.state.select_job(job_id),
            UiAction::SetCustomDescription(text) => self.state.set_custom_description(text),
            UiAction::Submit => {
                let commands = self.state.submit(now);
                self.dispatch(commands, now);
            }
            UiAction::Reset => self.state.reset(now),
            UiAction::ToggleHistory => {
                let commands = self.state.toggle_history();
                self.dispatch(commands, now);
            }
            UiAction::DownloadReport => {
                let commands = self.state.download_report(
                    self.startup.report_dir.clone(),
                    report_file_name(Utc::now()),
                    Local::now().naive_local(),
                    now,
                );
                self.dispatch(commands, now);
            }
            UiAction::SaveReportAs => {
                if !self.state.can_download_report() {
                    return;
                }
                let Some(target) = rfd::FileDialog::new()
                    .add_filter("Text", &["txt"])
                    .set_directory(&self.startup.report_dir)
                    .set_file_name(report_file_name(Utc::now()))
                    .save_file()
                else {
                    return;
                };
                let Some((dir, file_name)) = split_target(&target) else {
                    self.state
                        .show_toast("Failed to save report", ToastKind::Error, now);
                    return;
                };
                let commands =
                    self.state
                        .download_report(dir, file_name, Local::now().naive_local(), now);
                self.dispatch(commands, now);
            }
            UiAction::CopyReport => {
                let Some(text) = self.state.report_text(Local::now().naive_local()) else {
                    return;
                };
                match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
                    Ok(()) => {
                        self.state
                            .show_toast("Report copied to clipboard", ToastKind::Success, now)
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "clipboard write failed");
                        self.state
                            .show_toast("Failed to copy report", ToastKind::Error, now);
                    }
                }
            }
            UiAction::ToggleTheme => {
                self.settings.theme = self.settings.theme.toggled();
            }
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_settings == Some(self.settings) {
            return;
        }
        ctx.set_visuals(visuals_for_theme(self.settings.theme));
        ctx.style_mut(|style| {
            style.text_styles = scaled_text_styles(self.settings.text_scale);
            style.spacing.item_spacing = egui::vec2(8.0, 6.0);
            style.spacing.button_padding = egui::vec2(10.0, 5.0);
        });
        self.applied_settings = Some(self.settings);
    }
}

/// Splits a save-dialog path into the directory and file name the report
/// writer expects.
fn split_target(target: &Path) -> Option<(PathBuf, String)> {
    let file_name = target.file_name()?.to_string_lossy().into_owned();
    let dir = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Some((dir, file_name))
}

impl eframe::App for AnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.apply_theme_if_needed(ctx);
        self.mount_once(now);
        self.process_ui_events(now);
        self.process_dropped_files(ctx, now);
        self.state.tick(now);

        let mut actions = Vec::new();
        panels::show_header(
            ctx,
            &self.state,
            self.settings.theme,
            &self.startup.api_base_url,
            &mut actions,
        );
        panels::show_history_panel(ctx, &self.state);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.set_max_width(900.0);
                    panels::show_upload_form(ui, &self.state, &mut actions);
                    panels::show_results(ui, &self.state, &mut actions);
                });
        });

        for action in actions {
            self.handle_action(action, now);
        }

        if let Some(toast) = self.state.toast() {
            show_toast(ctx, toast, now);
        }

        ctx.request_repaint_after(FRAME_INTERVAL);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(serialized) = serde_json::to_string(&self.settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
