//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use shared::protocol::JobTarget;

use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};

/// Correlates an analysis response with the submission that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    LoadJobs,
    Analyze {
        request_id: RequestId,
        target: JobTarget,
        resume_path: PathBuf,
    },
    LoadHistory,
    SaveReport {
        dir: PathBuf,
        file_name: String,
        contents: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadJobs => "load_jobs",
            Self::Analyze { .. } => "analyze",
            Self::LoadHistory => "load_history",
            Self::SaveReport { .. } => "save_report",
        }
    }

    /// Event that resolves this command when it never reaches the worker.
    pub fn undelivered(&self, reason: &str) -> UiEvent {
        let error = |context| UiError::new(UiErrorCategory::Queue, context, reason);
        match self {
            Self::LoadJobs => UiEvent::JobsFailed(error(UiErrorContext::LoadJobs)),
            Self::Analyze { request_id, .. } => UiEvent::AnalysisFailed {
                request_id: *request_id,
                error: error(UiErrorContext::Analyze),
            },
            Self::LoadHistory => UiEvent::HistoryFailed(error(UiErrorContext::LoadHistory)),
            Self::SaveReport { .. } => UiEvent::ReportFailed(error(UiErrorContext::SaveReport)),
        }
    }
}
