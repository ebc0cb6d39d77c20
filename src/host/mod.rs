//! Host integration: panel lifecycle and access to the open work item

mod azure;
mod error;
mod traits;
mod types;

pub use azure::{AzureDevOpsHost, AzureHostConfig};
pub use error::HostError;
pub use traits::{HostSdk, WorkItemForm};
pub use types::*;

#[cfg(test)]
pub use traits::{MockHostSdk, MockWorkItemForm};
