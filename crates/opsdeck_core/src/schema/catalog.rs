//! Canonical field sets and index declarations for every entity kind.

use super::{EntitySchema, FieldSpec, FieldType, IndexSpec};
use crate::model::activity::ActivityKind;
use crate::model::calendar_event::EventKind;
use crate::model::contact::ContactStatus;
use crate::model::content_draft::{DraftKind, DraftStatus};
use crate::model::ecosystem_product::{ProductHealth, ProductStatus};
use crate::model::task::{TaskPriority, TaskStatus};
use crate::model::EntityKind;

const fn required(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        ty,
        required: true,
    }
}

const fn optional(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        ty,
        required: false,
    }
}

const fn index(name: &'static str, field: &'static str, column: &'static str) -> IndexSpec {
    IndexSpec {
        name,
        field,
        column,
    }
}

const EPOCH_MS: FieldType = FieldType::Integer {
    min: Some(0),
    max: None,
};
const COUNT: FieldType = FieldType::Integer {
    min: Some(0),
    max: None,
};
const AMOUNT: FieldType = FieldType::Number { min: Some(0.0) };

static ACTIVITIES: EntitySchema = EntitySchema {
    kind: EntityKind::Activities,
    fields: &[
        required("id", FieldType::Id),
        required("type", FieldType::Enum(ActivityKind::LITERALS)),
        required("message", FieldType::Text),
        required("timestamp", EPOCH_MS),
        optional("metadata", FieldType::Any),
    ],
    indexes: &[
        index("by_timestamp", "timestamp", "ix_timestamp"),
        index("by_type", "type", "ix_type"),
    ],
};

static CALENDAR_EVENTS: EntitySchema = EntitySchema {
    kind: EntityKind::CalendarEvents,
    fields: &[
        required("id", FieldType::Id),
        required("title", FieldType::Text),
        required("date", FieldType::Date),
        optional("time", FieldType::Time),
        required("type", FieldType::Enum(EventKind::LITERALS)),
        optional("participants", FieldType::TextList),
        required("createdAt", EPOCH_MS),
    ],
    indexes: &[index("by_date", "date", "ix_date")],
};

static TASKS: EntitySchema = EntitySchema {
    kind: EntityKind::Tasks,
    fields: &[
        required("id", FieldType::Id),
        required("title", FieldType::Text),
        required("description", FieldType::Text),
        required("priority", FieldType::Enum(TaskPriority::LITERALS)),
        required("status", FieldType::Enum(TaskStatus::LITERALS)),
        optional("assignee", FieldType::Text),
        optional("dueDate", FieldType::Text),
        required("tags", FieldType::TextList),
        required("project", FieldType::Text),
        required("createdAt", EPOCH_MS),
        required("updatedAt", EPOCH_MS),
    ],
    indexes: &[
        index("by_status", "status", "ix_status"),
        index("by_assignee", "assignee", "ix_assignee"),
        index("by_priority", "priority", "ix_priority"),
        index("by_due_date", "dueDate", "ix_due_date"),
    ],
};

static CONTACTS: EntitySchema = EntitySchema {
    kind: EntityKind::Contacts,
    fields: &[
        required("id", FieldType::Id),
        required("name", FieldType::Text),
        required("company", FieldType::Text),
        required("email", FieldType::Email),
        optional("phone", FieldType::Text),
        required("status", FieldType::Enum(ContactStatus::LITERALS)),
        required("value", AMOUNT),
        required("lastContact", FieldType::Text),
        required("nextAction", FieldType::Text),
        required("tags", FieldType::TextList),
        required("location", FieldType::Text),
        required("createdAt", EPOCH_MS),
    ],
    indexes: &[
        index("by_status", "status", "ix_status"),
        index("by_email", "email", "ix_email"),
        index("by_company", "company", "ix_company"),
    ],
};

static CONTENT_DRAFTS: EntitySchema = EntitySchema {
    kind: EntityKind::ContentDrafts,
    fields: &[
        required("id", FieldType::Id),
        required("title", FieldType::Text),
        required("type", FieldType::Enum(DraftKind::LITERALS)),
        required("status", FieldType::Enum(DraftStatus::LITERALS)),
        required("author", FieldType::Text),
        optional("content", FieldType::Text),
        required(
            "progress",
            FieldType::Integer {
                min: Some(0),
                max: Some(100),
            },
        ),
        required("wordCount", COUNT),
        required("lastEdited", EPOCH_MS),
        optional("dueDate", FieldType::Date),
        required("tags", FieldType::TextList),
        required("comments", COUNT),
        required("createdAt", EPOCH_MS),
    ],
    indexes: &[
        index("by_status", "status", "ix_status"),
        index("by_author", "author", "ix_author"),
        index("by_type", "type", "ix_type"),
    ],
};

static ECOSYSTEM_PRODUCTS: EntitySchema = EntitySchema {
    kind: EntityKind::EcosystemProducts,
    fields: &[
        required("id", FieldType::Id),
        required("name", FieldType::Text),
        required("description", FieldType::Text),
        required("category", FieldType::Text),
        required("status", FieldType::Enum(ProductStatus::LITERALS)),
        required("health", FieldType::Enum(ProductHealth::LITERALS)),
        required("users", AMOUNT),
        required("revenue", AMOUNT),
        required("version", FieldType::Text),
        required("uptime", FieldType::Text),
        required("requestsPerDay", AMOUNT),
        required("avgResponseTime", FieldType::Text),
        required("errorRate", FieldType::Text),
        required("createdAt", EPOCH_MS),
        required("updatedAt", EPOCH_MS),
    ],
    indexes: &[
        index("by_status", "status", "ix_status"),
        index("by_category", "category", "ix_category"),
    ],
};

/// Returns the schema declared for `kind`.
pub fn schema_for(kind: EntityKind) -> &'static EntitySchema {
    match kind {
        EntityKind::Activities => &ACTIVITIES,
        EntityKind::CalendarEvents => &CALENDAR_EVENTS,
        EntityKind::Tasks => &TASKS,
        EntityKind::Contacts => &CONTACTS,
        EntityKind::ContentDrafts => &CONTENT_DRAFTS,
        EntityKind::EcosystemProducts => &ECOSYSTEM_PRODUCTS,
    }
}
