//! Activity feed entries.

use super::{Entity, EntityKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

closed_set! {
    /// Origin of an activity entry.
    ActivityKind {
        Agent => "agent",
        System => "system",
        User => "user",
    }
}

/// One entry in the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub message: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    /// Free-form payload, e.g. `{"category": "git", "sha": "..."}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Entity for Activity {
    const KIND: EntityKind = EntityKind::Activities;

    fn id(&self) -> &str {
        &self.id
    }
}
