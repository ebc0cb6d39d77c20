//! Trait abstraction for the story backend to enable mocking in tests

use super::error::BackendError;
use super::types::{HealthStatus, StoryResult, WikiPage};
use crate::host::WorkItemId;
use async_trait::async_trait;

/// Story backend operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryBackend: Send + Sync {
    /// Find wiki pages related to an Epic title
    async fn find_wiki_pages(&self, epic_title: &str) -> Result<Vec<WikiPage>, BackendError>;

    /// Generate stories from wiki pages and link them to the Epic
    async fn generate_stories(
        &self,
        wiki_page_paths: &[String],
        epic_id: WorkItemId,
    ) -> Result<Vec<StoryResult>, BackendError>;

    /// Probe the backend's health endpoint
    async fn health(&self) -> Result<HealthStatus, BackendError>;
}
