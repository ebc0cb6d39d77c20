//! Failures of panel initialization and of a generation run

use crate::backend::BackendError;
use crate::host::HostError;
use thiserror::Error;

/// Fatal: the panel could not attach to its host
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to initialize host: {0}")]
    Init(#[source] HostError),

    #[error("Host did not become ready: {0}")]
    Ready(#[source] HostError),

    #[error("Work item form unavailable: {0}")]
    Service(#[source] HostError),
}

/// Recoverable: reported in the status display, the trigger is re-enabled
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Epic title is empty. Add a title to the Epic and try again.")]
    MissingTitle,

    #[error("Failed to find wiki pages: HTTP {status}")]
    Lookup { status: u16 },

    #[error("Failed to generate stories: HTTP {status}")]
    Generation { status: u16 },

    #[error("Could not read the Epic: {0}")]
    Host(#[from] HostError),

    /// Backend failure that carries no status code
    #[error("Backend request failed: {0}")]
    Backend(#[source] BackendError),
}

impl WorkflowError {
    pub(crate) fn lookup(err: BackendError) -> Self {
        match err.status_code() {
            Some(status) => Self::Lookup { status },
            None => Self::Backend(err),
        }
    }

    pub(crate) fn generation(err: BackendError) -> Self {
        match err.status_code() {
            Some(status) => Self::Generation { status },
            None => Self::Backend(err),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Lookup { status } | Self::Generation { status } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> BackendError {
        BackendError::Status {
            status: code,
            body: String::new(),
        }
    }

    #[test]
    fn test_lookup_keeps_status() {
        let err = WorkflowError::lookup(status(502));
        assert!(matches!(err, WorkflowError::Lookup { status: 502 }));
        assert_eq!(err.to_string(), "Failed to find wiki pages: HTTP 502");
        assert_eq!(err.status_code(), Some(502));
    }

    #[test]
    fn test_generation_keeps_status() {
        let err = WorkflowError::generation(status(404));
        assert_eq!(err.to_string(), "Failed to generate stories: HTTP 404");
    }

    #[test]
    fn test_statusless_failure_is_backend_error() {
        let err = WorkflowError::lookup(BackendError::InvalidResponse("eof".to_string()));
        assert!(matches!(err, WorkflowError::Backend(_)));
        assert_eq!(err.status_code(), None);
        assert_eq!(
            err.to_string(),
            "Backend request failed: invalid response: eof"
        );
    }

    #[test]
    fn test_init_error_message() {
        let err = InitError::Init(HostError::NotConfigured("AZURE_TOKEN"));
        assert_eq!(
            err.to_string(),
            "Failed to initialize host: AZURE_TOKEN is not configured"
        );
    }
}
