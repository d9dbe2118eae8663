//! Owned UI state and its transitions.
//!
//! Rendering reads [`AppState`] and calls its transition methods; backend
//! outcomes come back through [`AppState::apply`]. Transitions never touch
//! egui or the network. Work for the backend is returned as
//! [`BackendCommand`]s for the orchestration layer to queue.

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use chrono::NaiveDateTime;
use client_core::report::render_report;
use shared::{
    domain::{AnalysisResult, HistoryEntry, JobId, JobPosting},
    protocol::{JobTarget, PDF_MIME_TYPE},
};
use tracing::{debug, warn};

use crate::backend_bridge::commands::{BackendCommand, RequestId};
use crate::controller::events::{UiError, UiEvent};

pub const TOAST_TTL: Duration = Duration::from_millis(4000);
pub const JOB_PLACEHOLDER: &str = "-- Choose a position --";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= TOAST_TTL
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        TOAST_TTL.saturating_sub(now.saturating_duration_since(self.shown_at))
    }
}

/// A file the user picked or dropped, before type validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: Option<String>,
}

impl FileCandidate {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());
        Self {
            path: path.to_path_buf(),
            file_name,
            mime_type,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type.as_deref() == Some(PDF_MIME_TYPE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedResume {
    pub path: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryStatus {
    NotLoaded,
    Loading,
    Loaded,
}

pub struct AppState {
    jobs: Vec<JobPosting>,
    jobs_loaded: bool,
    jobs_pending: bool,
    selected_job: Option<JobId>,
    custom_description: String,
    staged_resume: Option<StagedResume>,

    in_flight: Option<RequestId>,
    next_request_id: u64,
    results: Option<AnalysisResult>,

    inline_error: Option<String>,
    toast: Option<Toast>,

    history: Vec<HistoryEntry>,
    history_status: HistoryStatus,
    /// Set when a reset or new analysis lands while a fetch is in flight.
    history_stale: bool,
    history_visible: bool,

    last_report_path: Option<PathBuf>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            jobs_loaded: false,
            jobs_pending: false,
            selected_job: None,
            custom_description: String::new(),
            staged_resume: None,
            in_flight: None,
            next_request_id: 1,
            results: None,
            inline_error: None,
            toast: None,
            history: Vec::new(),
            history_status: HistoryStatus::NotLoaded,
            history_stale: false,
            history_visible: false,
            last_report_path: None,
        }
    }

    pub fn jobs(&self) -> &[JobPosting] {
        &self.jobs
    }

    pub fn jobs_loaded(&self) -> bool {
        self.jobs_loaded
    }

    /// True while the job list request is outstanding.
    pub fn jobs_pending(&self) -> bool {
        self.jobs_pending
    }

    pub fn selected_job(&self) -> Option<JobId> {
        self.selected_job
    }

    pub fn selected_job_title(&self) -> &str {
        self.selected_job
            .and_then(|id| self.jobs.iter().find(|job| job.id == id))
            .map(|job| job.job_title.as_str())
            .unwrap_or(JOB_PLACEHOLDER)
    }

    /// Selector entries: the placeholder followed by every job posting.
    pub fn job_options(&self) -> Vec<(Option<JobId>, String)> {
        std::iter::once((None, JOB_PLACEHOLDER.to_string()))
            .chain(
                self.jobs
                    .iter()
                    .map(|job| (Some(job.id), job.job_title.clone())),
            )
            .collect()
    }

    pub fn custom_description(&self) -> &str {
        &self.custom_description
    }

    pub fn staged_resume(&self) -> Option<&StagedResume> {
        self.staged_resume.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn results(&self) -> Option<&AnalysisResult> {
        self.results.as_ref()
    }

    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn history_visible(&self) -> bool {
        self.history_visible
    }

    pub fn last_report_path(&self) -> Option<&Path> {
        self.last_report_path.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading()
    }

    pub fn can_download_report(&self) -> bool {
        self.results.is_some()
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.toast = Some(Toast {
            message: message.into(),
            kind,
            shown_at: now,
        });
    }

    /// Drops the toast once its display interval has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| toast.is_expired(now)) {
            self.toast = None;
        }
    }

    pub fn on_mount(&mut self) -> Vec<BackendCommand> {
        self.jobs_pending = true;
        vec![BackendCommand::LoadJobs]
    }

    pub fn select_file(&mut self, candidate: FileCandidate, now: Instant) {
        if candidate.is_pdf() {
            self.show_toast(
                format!("{} selected", candidate.file_name),
                ToastKind::Success,
                now,
            );
            self.staged_resume = Some(StagedResume {
                path: candidate.path,
                file_name: candidate.file_name,
            });
            self.inline_error = None;
        } else {
            debug!(
                file = %candidate.file_name,
                mime = candidate.mime_type.as_deref().unwrap_or("unknown"),
                "rejected non-PDF selection"
            );
            self.staged_resume = None;
            self.inline_error = Some("Please select a PDF file".to_string());
            self.show_toast("Invalid file type", ToastKind::Error, now);
        }
    }

    pub fn select_job(&mut self, job_id: Option<JobId>) {
        self.selected_job = job_id.filter(|id| self.jobs.iter().any(|job| job.id == *id));
    }

    pub fn set_custom_description(&mut self, text: String) {
        self.custom_description = text;
    }

    pub fn job_target(&self) -> Option<JobTarget> {
        JobTarget::from_parts(self.selected_job, Some(&self.custom_description))
    }

    pub fn submit(&mut self, now: Instant) -> Vec<BackendCommand> {
        if self.is_loading() {
            return Vec::new();
        }

        let Some(resume) = self.staged_resume.clone() else {
            self.inline_error = Some("Please upload your resume".to_string());
            self.show_toast("Please select a resume file", ToastKind::Warning, now);
            return Vec::new();
        };

        let Some(target) = self.job_target() else {
            self.inline_error = Some("Please select a job position".to_string());
            self.show_toast("Please select a job position", ToastKind::Warning, now);
            return Vec::new();
        };

        let request_id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        self.in_flight = Some(request_id);
        self.inline_error = None;
        self.show_toast("Analyzing your resume...", ToastKind::Info, now);

        vec![BackendCommand::Analyze {
            request_id,
            target,
            resume_path: resume.path,
        }]
    }

    /// Clears the form and results. History visibility and any in-flight
    /// analysis are left alone.
    pub fn reset(&mut self, now: Instant) {
        self.staged_resume = None;
        self.selected_job = None;
        self.custom_description.clear();
        self.results = None;
        self.inline_error = None;
        self.mark_history_stale();
        self.show_toast("Ready for new analysis", ToastKind::Info, now);
    }

    pub fn toggle_history(&mut self) -> Vec<BackendCommand> {
        self.history_visible = !self.history_visible;
        if self.history_visible && self.history_status == HistoryStatus::NotLoaded {
            self.history_status = HistoryStatus::Loading;
            return vec![BackendCommand::LoadHistory];
        }
        Vec::new()
    }

    /// Report text for the current results, if any.
    pub fn report_text(&self, generated_at: NaiveDateTime) -> Option<String> {
        self.results
            .as_ref()
            .map(|result| render_report(result, generated_at))
    }

    pub fn download_report(
        &mut self,
        dir: PathBuf,
        file_name: String,
        generated_at: NaiveDateTime,
        now: Instant,
    ) -> Vec<BackendCommand> {
        let Some(contents) = self.report_text(generated_at) else {
            return Vec::new();
        };
        self.show_toast("Generating report...", ToastKind::Info, now);
        vec![BackendCommand::SaveReport {
            dir,
            file_name,
            contents,
        }]
    }

    pub fn apply(&mut self, event: UiEvent, now: Instant) -> Vec<BackendCommand> {
        match event {
            UiEvent::JobsLoaded(jobs) => {
                self.jobs = jobs;
                self.jobs_loaded = true;
                self.jobs_pending = false;
                if let Some(selected) = self.selected_job {
                    if !self.jobs.iter().any(|job| job.id == selected) {
                        self.selected_job = None;
                    }
                }
                if self.jobs.is_empty() {
                    self.show_toast("No job positions available", ToastKind::Warning, now);
                }
            }
            UiEvent::JobsFailed(error) => {
                self.jobs.clear();
                self.jobs_pending = false;
                self.fail(&error, now);
            }
            UiEvent::AnalysisSucceeded { request_id, result } => {
                if self.in_flight != Some(request_id) {
                    debug!(request_id = request_id.0, "ignoring superseded analysis result");
                    return Vec::new();
                }
                self.in_flight = None;
                self.results = Some(result);
                self.mark_history_stale();
                self.show_toast("Resume analyzed successfully!", ToastKind::Success, now);
            }
            UiEvent::AnalysisFailed { request_id, error } => {
                if self.in_flight != Some(request_id) {
                    debug!(request_id = request_id.0, "ignoring superseded analysis failure");
                    return Vec::new();
                }
                self.in_flight = None;
                self.fail(&error, now);
            }
            UiEvent::HistoryLoaded(history) => {
                self.history_status = if self.history_stale {
                    HistoryStatus::NotLoaded
                } else {
                    HistoryStatus::Loaded
                };
                self.history_stale = false;
                self.show_toast(
                    format!("Loaded {} past analyses", history.len()),
                    ToastKind::Success,
                    now,
                );
                self.history = history;
            }
            UiEvent::HistoryFailed(error) => {
                self.history_status = HistoryStatus::NotLoaded;
                self.history_stale = false;
                self.history.clear();
                self.fail(&error, now);
            }
            UiEvent::ReportSaved(path) => {
                self.last_report_path = Some(path);
                self.show_toast("Report downloaded!", ToastKind::Success, now);
            }
            UiEvent::ReportFailed(error) => {
                warn!(detail = error.detail(), "report was not saved");
                self.show_toast(error.context().toast_message(), ToastKind::Error, now);
            }
            UiEvent::BackendStartupFailed(error) => {
                self.in_flight = None;
                self.fail(&error, now);
            }
        }
        Vec::new()
    }

    /// Held history must be refetched on the next toggle-on. A fetch already
    /// in flight may predate the change, so its answer is kept but not trusted.
    fn mark_history_stale(&mut self) {
        match self.history_status {
            HistoryStatus::Loaded => self.history_status = HistoryStatus::NotLoaded,
            HistoryStatus::Loading => self.history_stale = true,
            HistoryStatus::NotLoaded => {}
        }
    }

    fn fail(&mut self, error: &UiError, now: Instant) {
        warn!(
            context = ?error.context(),
            category = ?error.category(),
            detail = error.detail(),
            "backend operation failed"
        );
        let context = error.context();
        self.inline_error = Some(context.inline_message().to_string());
        self.show_toast(context.toast_message(), ToastKind::Error, now);
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
