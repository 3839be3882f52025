//! Content pipeline drafts.

use super::{Entity, EntityKind};
use serde::{Deserialize, Serialize};

closed_set! {
    DraftKind {
        Blog => "blog",
        Social => "social",
        Email => "email",
        Doc => "doc",
        Script => "script",
    }
}

closed_set! {
    DraftStatus {
        Idea => "idea",
        Drafting => "drafting",
        Review => "review",
        Approved => "approved",
        Published => "published",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDraft {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: DraftKind,
    pub status: DraftStatus,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Completion percentage, 0..=100.
    pub progress: u8,
    pub word_count: u32,
    /// Unix epoch milliseconds.
    pub last_edited: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub tags: Vec<String>,
    pub comments: u32,
    pub created_at: i64,
}

impl Entity for ContentDraft {
    const KIND: EntityKind = EntityKind::ContentDrafts;

    fn id(&self) -> &str {
        &self.id
    }
}
