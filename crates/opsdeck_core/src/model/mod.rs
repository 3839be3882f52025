//! Domain model for the six persisted entity kinds.
//!
//! # Responsibility
//! - Define typed records and closed enumerations for every entity kind.
//! - Bridge typed records and schemaless JSON documents.
//!
//! # Invariants
//! - Every record is identified by an `id` unique within its kind.
//! - Enumerated attributes serialize to the literal strings declared in
//!   `schema`; `LITERALS` on each enum is the single source for both.
//! - JSON field names are camelCase, the enumerated "kind" attribute is
//!   serialized as `type`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Declares a closed set of string literals as a serde-backed enum.
macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $literal:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        pub enum $name {
            $($(#[$variant_meta])* #[serde(rename = $literal)] $variant,)+
        }

        impl $name {
            /// Literal values accepted for this attribute, in declaration order.
            pub const LITERALS: &'static [&'static str] = &[$($literal),+];

            /// Stable wire value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $literal,)+
                }
            }

            /// Parses one wire value; exact match only.
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($literal => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod activity;
pub mod calendar_event;
pub mod contact;
pub mod content_draft;
pub mod ecosystem_product;
pub mod task;

/// Schemaless record shape stored by the entity store.
pub type Document = Map<String, Value>;

/// One of the six persisted record categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Activities,
    CalendarEvents,
    Tasks,
    Contacts,
    ContentDrafts,
    EcosystemProducts,
}

impl EntityKind {
    /// All kinds in seed order.
    pub const ALL: [EntityKind; 6] = [
        Self::Activities,
        Self::CalendarEvents,
        Self::Tasks,
        Self::Contacts,
        Self::ContentDrafts,
        Self::EcosystemProducts,
    ];

    /// Collection name used in JSON payloads and generic routes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activities => "activities",
            Self::CalendarEvents => "calendarEvents",
            Self::Tasks => "tasks",
            Self::Contacts => "contacts",
            Self::ContentDrafts => "contentDrafts",
            Self::EcosystemProducts => "ecosystemProducts",
        }
    }

    /// Backing SQLite table name.
    pub fn table(self) -> &'static str {
        match self {
            Self::Activities => "activities",
            Self::CalendarEvents => "calendar_events",
            Self::Tasks => "tasks",
            Self::Contacts => "contacts",
            Self::ContentDrafts => "content_drafts",
            Self::EcosystemProducts => "ecosystem_products",
        }
    }

    /// Parses a collection name or table name.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized || kind.table() == normalized)
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed record persisted under one entity kind.
pub trait Entity: Serialize + DeserializeOwned {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

/// Serializes a typed record into a store document.
pub fn to_document<E: Entity>(record: &E) -> serde_json::Result<Document> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
            "{} record did not serialize to a JSON object",
            E::KIND
        ))),
    }
}

/// Deserializes a store document into a typed record.
pub fn from_document<E: Entity>(document: Document) -> serde_json::Result<E> {
    serde_json::from_value(Value::Object(document))
}

#[cfg(test)]
mod tests {
    use super::EntityKind;

    #[test]
    fn kind_parses_collection_and_table_names() {
        assert_eq!(EntityKind::parse("tasks"), Some(EntityKind::Tasks));
        assert_eq!(
            EntityKind::parse("calendarEvents"),
            Some(EntityKind::CalendarEvents)
        );
        assert_eq!(
            EntityKind::parse("content_drafts"),
            Some(EntityKind::ContentDrafts)
        );
        assert_eq!(EntityKind::parse(" contacts "), Some(EntityKind::Contacts));
        assert_eq!(EntityKind::parse("agents"), None);
    }

    #[test]
    fn every_kind_has_distinct_names() {
        let mut names = EntityKind::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EntityKind::ALL.len());
    }
}
