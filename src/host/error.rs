//! Errors raised by the host integration

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    /// A setting required to reach the host is missing
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("invalid {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    /// The host does not provide the requested capability
    #[error("service '{0}' is not available")]
    ServiceUnavailable(String),

    /// The host was initialized twice, or used before init
    #[error("host session is {0}")]
    InvalidSession(&'static str),

    /// The host API answered with a non-2xx status
    #[error("host returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("host request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid host response: {0}")]
    InvalidResponse(String),
}
