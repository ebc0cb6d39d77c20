//! Wire types for the story backend

use crate::host::WorkItemId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Story status the backend reports for a persisted story
pub const STATUS_CREATED: &str = "created";

/// Body of `POST /find_wiki_pages`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FindWikiPagesRequest {
    pub epic_title: String,
}

/// Response of `POST /find_wiki_pages`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FindWikiPagesResponse {
    #[serde(default)]
    pub pages: Vec<WikiPage>,
}

/// A wiki page the backend matched to the Epic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WikiPage {
    pub path: String,
    /// Match confidence between 0.0 and 1.0, when the backend scored it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Why the backend considers the page related
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WikiPage {
    #[cfg(test)]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Body of `POST /generate_stories`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateStoriesRequest {
    pub wiki_page_paths: Vec<String>,
    pub epic_id: WorkItemId,
}

/// Response of `POST /generate_stories`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerateStoriesResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stories: Vec<StoryResult>,
}

/// Outcome of creating a single story
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StoryResult {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoryResult {
    #[cfg(test)]
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn is_created(&self) -> bool {
        self.status == STATUS_CREATED
    }
}

/// Count the stories the backend actually persisted
pub fn count_created(stories: &[StoryResult]) -> usize {
    stories.iter().filter(|s| s.is_created()).count()
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}
