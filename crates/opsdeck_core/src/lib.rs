//! Core domain logic for the OpsDeck operations dashboard.
//! This crate owns the entity schemas, the document store and the seed
//! fixtures; HTTP and CLI layers only orchestrate it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod seed;
pub mod service;
pub mod store;

pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::activity::{Activity, ActivityKind};
pub use model::calendar_event::{CalendarEvent, EventKind};
pub use model::contact::{Contact, ContactStatus};
pub use model::content_draft::{ContentDraft, DraftKind, DraftStatus};
pub use model::ecosystem_product::{EcosystemProduct, ProductHealth, ProductStatus};
pub use model::task::{Task, TaskPriority, TaskStatus};
pub use model::{from_document, to_document, Document, Entity, EntityKind};
pub use repo::entity_repo::{EntityRepository, SqliteEntityRepository, StoreError, StoreResult};
pub use schema::{schema_for, validate, EntitySchema, ValidationError};
pub use seed::{seed_all, seed_kind, SeedError, SeedReport};
pub use service::entity_service::EntityService;
pub use store::EntityStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
