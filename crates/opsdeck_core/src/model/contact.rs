//! CRM contacts.

use super::{Entity, EntityKind};
use serde::{Deserialize, Serialize};

closed_set! {
    /// Pipeline stage of a contact.
    ContactStatus {
        Prospect => "prospect",
        Contacted => "contacted",
        Meeting => "meeting",
        Proposal => "proposal",
        Active => "active",
        Churned => "churned",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub company: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub status: ContactStatus,
    /// Deal value; never negative.
    pub value: f64,
    pub last_contact: String,
    pub next_action: String,
    pub tags: Vec<String>,
    pub location: String,
    pub created_at: i64,
}

impl Contact {
    /// Returns whether the contact still counts toward the sales pipeline.
    pub fn in_pipeline(&self) -> bool {
        self.status != ContactStatus::Churned
    }
}

impl Entity for Contact {
    const KIND: EntityKind = EntityKind::Contacts;

    fn id(&self) -> &str {
        &self.id
    }
}
