//! Host capabilities consumed by the panel

use super::error::HostError;
use super::types::WorkItemId;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Panel lifecycle handshake and service lookup provided by the host
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostSdk: Send + Sync {
    /// Acquire a session with the host
    async fn init(&self) -> Result<(), HostError>;

    /// Wait until the host is ready to serve requests
    async fn ready(&self) -> Result<(), HostError>;

    /// Tell the host the panel loaded
    fn notify_load_succeeded(&self);

    /// Tell the host the panel failed to load
    fn notify_load_failed(&self, message: &str);

    /// Look up a capability by service id
    async fn get_service(&self, service_id: &str) -> Result<Arc<dyn WorkItemForm>, HostError>;
}

/// Access to the work item the panel is shown on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkItemForm: Send + Sync {
    /// Id of the open work item
    async fn get_id(&self) -> Result<WorkItemId, HostError>;

    /// Value of a field by reference name, `None` when unset
    async fn get_field_value(&self, field_name: &str) -> Result<Option<Value>, HostError>;

    /// Reload the work item so the host shows fresh data
    async fn refresh(&self) -> Result<(), HostError>;
}
