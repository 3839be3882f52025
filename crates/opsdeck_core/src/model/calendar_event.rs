//! Calendar events.

use super::{Entity, EntityKind};
use serde::{Deserialize, Serialize};

closed_set! {
    EventKind {
        Meeting => "meeting",
        Deadline => "deadline",
        Reminder => "reminder",
    }
}

/// Dated calendar entry. `date` is `YYYY-MM-DD`, `time` is `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<String>>,
    pub created_at: i64,
}

impl Entity for CalendarEvent {
    const KIND: EntityKind = EntityKind::CalendarEvents;

    fn id(&self) -> &str {
        &self.id
    }
}
