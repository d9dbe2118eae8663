//! Backend-to-UI events and error modeling for the desktop controller.

use std::path::PathBuf;

use client_core::ClientError;
use shared::domain::{AnalysisResult, HistoryEntry, JobPosting};

use crate::backend_bridge::commands::RequestId;

pub enum UiEvent {
    JobsLoaded(Vec<JobPosting>),
    JobsFailed(UiError),
    AnalysisSucceeded {
        request_id: RequestId,
        result: AnalysisResult,
    },
    AnalysisFailed {
        request_id: RequestId,
        error: UiError,
    },
    HistoryLoaded(Vec<HistoryEntry>),
    HistoryFailed(UiError),
    ReportSaved(PathBuf),
    ReportFailed(UiError),
    BackendStartupFailed(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Rejected,
    Decode,
    Io,
    Queue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadJobs,
    Analyze,
    LoadHistory,
    SaveReport,
}

impl UiErrorContext {
    /// Inline message shown for every failure kind in this context.
    pub fn inline_message(self) -> &'static str {
        match self {
            Self::BackendStartup => "Backend worker failed to start",
            Self::LoadJobs => "Failed to load jobs",
            Self::Analyze => "Failed to analyze resume",
            Self::LoadHistory => "Failed to load history",
            Self::SaveReport => "Failed to save report",
        }
    }

    pub fn toast_message(self) -> &'static str {
        match self {
            Self::BackendStartup => "Backend worker failed to start",
            Self::LoadJobs => "Failed to connect to backend",
            Self::Analyze => "Error analyzing resume",
            Self::LoadHistory => "Failed to load history",
            Self::SaveReport => "Failed to save report",
        }
    }
}

/// A failure as seen by the controller: where it happened, what kind it was,
/// and the detailed cause kept for logs.
#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    detail: String,
}

impl UiError {
    pub fn from_client(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Transport(_) | ClientError::InvalidBaseUrl { .. } => {
                UiErrorCategory::Transport
            }
            ClientError::Status { .. } => UiErrorCategory::Server,
            ClientError::Rejected { .. } => UiErrorCategory::Rejected,
            ClientError::Decode(_) => UiErrorCategory::Decode,
            ClientError::Io { .. } => UiErrorCategory::Io,
        };
        Self {
            category,
            context,
            detail: err.to_string(),
        }
    }

    pub fn new(
        category: UiErrorCategory,
        context: UiErrorContext,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            category,
            context,
            detail: detail.into(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}
