//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{report::save_report, AnalyzerApi, ResumeUpload};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};

/// Starts the backend worker thread. Every command runs on its own task so a
/// slow analysis never holds up a history or job fetch.
pub fn launch(
    api: Arc<dyn AnalyzerApi>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                deliver(
                    &ui_tx,
                    UiEvent::BackendStartupFailed(UiError::new(
                        UiErrorCategory::Io,
                        UiErrorContext::BackendStartup,
                        format!("failed to build backend runtime: {err}"),
                    )),
                );
                return;
            }
        };

        runtime.block_on(async move {
            tracing::info!("backend worker ready");
            while let Ok(cmd) = cmd_rx.recv() {
                let api = api.clone();
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let event = execute(api.as_ref(), cmd).await;
                    // Waits for queue space off the async workers.
                    if let Err(err) =
                        tokio::task::spawn_blocking(move || deliver(&ui_tx, event)).await
                    {
                        tracing::warn!("ui event delivery task failed: {err}");
                    }
                });
            }
            tracing::info!("ui command queue closed; backend worker stopping");
        });
    })
}

/// Blocks until the UI has room for `event`. Every command outcome is
/// delivered, so no in-flight flag is left without its answer.
fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if ui_tx.send(event).is_err() {
        tracing::debug!("ui closed; dropping event");
    }
}

/// Runs one command against the analysis service and maps the outcome to the
/// event the controller expects.
pub async fn execute(api: &dyn AnalyzerApi, cmd: BackendCommand) -> UiEvent {
    tracing::debug!(command = cmd.name(), "executing backend command");
    match cmd {
        BackendCommand::LoadJobs => match api.list_jobs().await {
            Ok(jobs) => UiEvent::JobsLoaded(jobs),
            Err(err) => UiEvent::JobsFailed(UiError::from_client(UiErrorContext::LoadJobs, &err)),
        },
        BackendCommand::Analyze {
            request_id,
            target,
            resume_path,
        } => {
            let outcome = match ResumeUpload::from_path(&resume_path).await {
                Ok(resume) => api.analyze_resume(target, resume).await,
                Err(err) => Err(err),
            };
            match outcome {
                Ok(result) => UiEvent::AnalysisSucceeded { request_id, result },
                Err(err) => UiEvent::AnalysisFailed {
                    request_id,
                    error: UiError::from_client(UiErrorContext::Analyze, &err),
                },
            }
        }
        BackendCommand::LoadHistory => match api.fetch_history().await {
            Ok(history) => UiEvent::HistoryLoaded(history),
            Err(err) => {
                UiEvent::HistoryFailed(UiError::from_client(UiErrorContext::LoadHistory, &err))
            }
        },
        BackendCommand::SaveReport {
            dir,
            file_name,
            contents,
        } => match save_report(&dir, &file_name, &contents).await {
            Ok(path) => UiEvent::ReportSaved(path),
            Err(err) => {
                UiEvent::ReportFailed(UiError::from_client(UiErrorContext::SaveReport, &err))
            }
        },
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
