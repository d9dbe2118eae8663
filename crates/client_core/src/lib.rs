use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, StatusCode,
};
use serde_json::Value;
use shared::{
    domain::{AnalysisResult, HistoryEntry, JobPosting},
    error::EnvelopeError,
    protocol::{
        Envelope, JobTarget, HISTORY_PATH, JOBS_PATH, PDF_MIME_TYPE, RESUME_FIELD, RESUME_PATH,
    },
};
use thiserror::Error;
use tracing::{debug, warn};

pub mod config;
pub mod report;

pub use config::{load_settings, DeployEnvironment, Settings};

/// Upper bound on how much of an error body is kept for diagnostics.
const ERROR_BODY_PREVIEW_LEN: usize = 512;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API base URL `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("request to analysis service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("analysis service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("could not decode analysis service response: {0}")]
    Decode(String),
    #[error("analysis service rejected the request: {message}")]
    Rejected { message: String },
    #[error("could not access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<EnvelopeError> for ClientError {
    fn from(value: EnvelopeError) -> Self {
        match value {
            EnvelopeError::Rejected { message } => Self::Rejected { message },
            EnvelopeError::Payload(err) => Self::Decode(err.to_string()),
        }
    }
}

/// A résumé ready to be sent: the file name shown to the service and the raw
/// PDF bytes.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ResumeUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume.pdf".to_string());
        Ok(Self { file_name, bytes })
    }
}

/// The three operations the analysis service exposes.
#[async_trait]
pub trait AnalyzerApi: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<JobPosting>, ClientError>;
    async fn analyze_resume(
        &self,
        target: JobTarget,
        resume: ResumeUpload,
    ) -> Result<AnalysisResult, ClientError>;
    async fn fetch_history(&self) -> Result<Vec<HistoryEntry>, ClientError>;
}

/// Stateless HTTP client for the analysis service. Every call is a single
/// round trip with no retries and no caching.
#[derive(Debug, Clone)]
pub struct AnalyzerClient {
    http: Client,
    base_url: String,
}

impl AnalyzerClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_http(base_url, Client::new())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_http(base_url, http)
    }

    /// Builds a client for `settings`, honoring an explicit base URL override.
    pub fn from_settings(
        settings: &Settings,
        explicit_base_url: Option<&str>,
    ) -> Result<Self, ClientError> {
        let base_url = settings.resolve_base_url(explicit_base_url);
        match settings.request_timeout {
            Some(timeout) => Self::with_timeout(&base_url, timeout),
            None => Self::new(&base_url),
        }
    }

    fn with_http(base_url: &str, http: Client) -> Result<Self, ClientError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        url::Url::parse(trimmed).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            http,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_envelope(&self, path: &str) -> Result<Envelope, ClientError> {
        let url = self.endpoint(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        let (envelope, _) = read_envelope(response).await?;
        Ok(envelope.accepted()?)
    }
}

async fn read_envelope(response: reqwest::Response) -> Result<(Envelope, Value), ClientError> {
    let status = response.status();
    let url = response.url().clone();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let body: String = String::from_utf8_lossy(&bytes)
            .chars()
            .take(ERROR_BODY_PREVIEW_LEN)
            .collect();
        warn!(%url, %status, "analysis service returned an error status");
        return Err(ClientError::Status { status, body });
    }

    let body: Value =
        serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))?;
    let envelope = match &body {
        Value::Object(_) => serde_json::from_value::<Envelope>(body.clone())
            .map_err(|err| ClientError::Decode(err.to_string()))?,
        // A bare payload without the wrapper is treated as an envelope whose
        // `data` is missing.
        _ => Envelope::default(),
    };
    debug!(%url, %status, "decoded response envelope");
    Ok((envelope, body))
}

#[async_trait]
impl AnalyzerApi for AnalyzerClient {
    async fn list_jobs(&self) -> Result<Vec<JobPosting>, ClientError> {
        let jobs = self.get_envelope(JOBS_PATH).await?.into_list()?;
        debug!(count = jobs.len(), "loaded job postings");
        Ok(jobs)
    }

    async fn analyze_resume(
        &self,
        target: JobTarget,
        resume: ResumeUpload,
    ) -> Result<AnalysisResult, ClientError> {
        let url = self.endpoint(RESUME_PATH);
        let (field, value) = target.form_field();
        let resume_part = Part::bytes(resume.bytes)
            .file_name(resume.file_name.clone())
            .mime_str(PDF_MIME_TYPE)?;
        let form = Form::new().text(field, value).part(RESUME_FIELD, resume_part);

        debug!(%url, target_field = field, file = %resume.file_name, "POST analysis");
        let response = self.http.post(&url).multipart(form).send().await?;
        let (envelope, body) = read_envelope(response).await?;
        let result: AnalysisResult = envelope.accepted()?.into_payload_or(body)?;
        debug!(rank = result.rank.value(), "analysis completed");
        Ok(result)
    }

    async fn fetch_history(&self) -> Result<Vec<HistoryEntry>, ClientError> {
        let history = self.get_envelope(HISTORY_PATH).await?.into_list()?;
        debug!(count = history.len(), "loaded analysis history");
        Ok(history)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
