//! Wire shapes of the analysis service: the `{status, data, message}`
//! envelope, endpoint paths, and multipart field names.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{domain::JobId, error::EnvelopeError};

pub const JOBS_PATH: &str = "/jobs/";
pub const RESUME_PATH: &str = "/resume/";
pub const HISTORY_PATH: &str = "/history/";

pub const RESUME_FIELD: &str = "resume";
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";
pub const CUSTOM_JOB_DESCRIPTION_FIELD: &str = "custom_job_description";

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Uniform response wrapper used by every endpoint.
///
/// `data` stays untyped until the caller decides how absence is handled:
/// list endpoints default to empty, the analysis endpoint falls back to the
/// whole body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, alias = "messages", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    pub fn ok(data: Value) -> Self {
        Self {
            status: Some(true),
            data: Some(data),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            status: Some(false),
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.status == Some(false)
    }

    /// Fails with [`EnvelopeError::Rejected`] when the service flagged the
    /// call as unsuccessful.
    pub fn accepted(self) -> Result<Self, EnvelopeError> {
        if self.is_rejected() {
            return Err(EnvelopeError::rejected(self.message));
        }
        Ok(self)
    }

    /// Decodes `data` as a list. A missing, null, or non-array `data` is an
    /// empty list, not an error.
    pub fn into_list<T: DeserializeOwned>(self) -> Result<Vec<T>, EnvelopeError> {
        match self.data {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(EnvelopeError::from))
                .collect(),
            _ => Ok(Vec::new()),
        }
    }

    /// Decodes `data`, or `body` itself when `data` is missing or null.
    pub fn into_payload_or<T: DeserializeOwned>(self, body: Value) -> Result<T, EnvelopeError> {
        let payload = match self.data {
            Some(Value::Null) | None => body,
            Some(data) => data,
        };
        Ok(serde_json::from_value(payload)?)
    }
}

/// Which job description an analysis is scored against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobTarget {
    Posting(JobId),
    Custom(String),
}

impl JobTarget {
    /// Non-blank custom text wins over a selected posting.
    pub fn from_parts(job_id: Option<JobId>, custom_description: Option<&str>) -> Option<Self> {
        if let Some(text) = custom_description.map(str::trim).filter(|t| !t.is_empty()) {
            return Some(Self::Custom(text.to_string()));
        }
        job_id.map(Self::Posting)
    }

    /// Multipart field name and value carried alongside the résumé.
    pub fn form_field(&self) -> (&'static str, String) {
        match self {
            Self::Posting(job_id) => (JOB_DESCRIPTION_FIELD, job_id.to_string()),
            Self::Custom(text) => (CUSTOM_JOB_DESCRIPTION_FIELD, text.clone()),
        }
    }
}
