//! Task board records.
//!
//! # Invariants
//! - `updated_at >= created_at`.
//! - `tags` keep insertion order; blank tags are rejected.

use super::{Entity, EntityKind};
use serde::{Deserialize, Serialize};

closed_set! {
    TaskPriority {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

closed_set! {
    /// Kanban column a task sits in.
    TaskStatus {
        Backlog => "backlog",
        Today => "today",
        InProgress => "in-progress",
        Review => "review",
        Done => "done",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Free-form due label ("Today", "2025-03-01", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub tags: Vec<String>,
    pub project: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Task {
    /// Returns whether the task still needs work.
    pub fn is_open(&self) -> bool {
        self.status != TaskStatus::Done
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Tasks;

    fn id(&self) -> &str {
        &self.id
    }
}
