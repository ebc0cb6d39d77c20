//! Panel state published to the UI

use crate::backend::{StoryResult, WikiPage};
use crate::host::EpicRef;
use chrono::{DateTime, Utc};

/// Controller lifecycle
///
/// `Uninitialized -> Ready -> Busy -> Ready`, or `Uninitialized -> Failed`
/// which is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Ready,
    Busy,
    Failed(String),
}

/// How a status message should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSeverity {
    Loading,
    Success,
    Error,
    Info,
}

impl StatusSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "Working",
            Self::Success => "Done",
            Self::Error => "Error",
            Self::Info => "Info",
        }
    }
}

/// Text shown in the status display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: StatusSeverity,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, severity: StatusSeverity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    pub fn loading(text: impl Into<String>) -> Self {
        Self::new(text, StatusSeverity::Loading)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, StatusSeverity::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, StatusSeverity::Error)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, StatusSeverity::Info)
    }
}

impl Default for StatusMessage {
    fn default() -> Self {
        Self::loading("Initializing...")
    }
}

/// Result of the last successful generation run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub pages: Vec<WikiPage>,
    pub stories: Vec<StoryResult>,
    pub created: usize,
    pub finished_at: DateTime<Utc>,
}

/// Snapshot of everything the panel displays
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelState {
    pub lifecycle: Lifecycle,
    pub status: StatusMessage,
    /// Epic as last read from the host
    pub epic: Option<EpicRef>,
    pub last_run: Option<RunSummary>,
}

impl PanelState {
    /// The trigger is only enabled while the controller is idle and loaded
    pub fn trigger_enabled(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Ready)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Busy)
    }

    /// Load failure message, once the panel is in its terminal state
    pub fn failure(&self) -> Option<&str> {
        match &self.lifecycle {
            Lifecycle::Failed(message) => Some(message),
            _ => None,
        }
    }
}
