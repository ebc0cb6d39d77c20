//! Work item types shared with the host

use serde::{Deserialize, Serialize};
use std::fmt;

/// Service id of the work-item-form capability
pub const WORK_ITEM_FORM_SERVICE: &str = "ms.vss-work-web.work-item-form";

/// Field reference names
pub const FIELD_TITLE: &str = "System.Title";
pub const FIELD_WORK_ITEM_TYPE: &str = "System.WorkItemType";

/// Work item identifier as assigned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItemId(pub u64);

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The Epic the panel is attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicRef {
    pub id: WorkItemId,
    pub title: String,
}
