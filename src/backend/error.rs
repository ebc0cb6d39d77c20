//! Errors returned by the story backend client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-2xx status
    #[error("HTTP {status}")]
    Status { status: u16, body: String },

    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    /// HTTP status code, when the backend produced one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
