use thiserror::Error;

pub const DEFAULT_REJECTION_MESSAGE: &str = "request rejected by analysis service";

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("analysis service rejected the request: {message}")]
    Rejected { message: String },
    #[error("malformed envelope payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl EnvelopeError {
    pub fn rejected(message: Option<String>) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string());
        Self::Rejected { message }
    }
}
