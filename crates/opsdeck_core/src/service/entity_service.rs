//! Entity use-case service.
//!
//! # Responsibility
//! - Expose the entity access API to callers, untyped and typed.
//! - Apply write defaults (timestamps) for handler-driven writes.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Defaults only fill absent fields; caller-supplied values win, except
//!   `updatedAt` on replace, which is always re-stamped.

use crate::model::{from_document, to_document, Document, Entity, EntityKind};
use crate::repo::entity_repo::{EntityRepository, StoreError, StoreResult};
use crate::schema::{schema_for, CREATED_AT_FIELD, UPDATED_AT_FIELD};
use serde_json::Value;

const LAST_EDITED_FIELD: &str = "lastEdited";

/// Use-case service wrapper for entity access.
pub struct EntityService<R: EntityRepository> {
    repo: R,
}

impl<R: EntityRepository> EntityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn insert(&self, kind: EntityKind, document: Document) -> StoreResult<Document> {
        self.repo.insert(kind, document)
    }

    pub fn get_by_id(&self, kind: EntityKind, id: &str) -> StoreResult<Document> {
        self.repo.get_by_id(kind, id)
    }

    pub fn query_by_index(
        &self,
        kind: EntityKind,
        index: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        self.repo.query_by_index(kind, index, value)
    }

    pub fn list(&self, kind: EntityKind) -> StoreResult<Vec<Document>> {
        self.repo.list(kind)
    }

    pub fn update(&self, kind: EntityKind, id: &str, document: Document) -> StoreResult<Document> {
        self.repo.update(kind, id, document)
    }

    pub fn remove(&self, kind: EntityKind, id: &str) -> StoreResult<()> {
        self.repo.remove(kind, id)
    }

    pub fn count(&self, kind: EntityKind) -> StoreResult<u64> {
        self.repo.count(kind)
    }

    /// Inserts a typed record and returns it as stored.
    pub fn insert_record<E: Entity>(&self, record: &E) -> StoreResult<E> {
        let document = to_document(record).map_err(encode_error::<E>)?;
        decode(self.repo.insert(E::KIND, document)?)
    }

    pub fn get_record<E: Entity>(&self, id: &str) -> StoreResult<E> {
        decode(self.repo.get_by_id(E::KIND, id)?)
    }

    pub fn query_records<E: Entity>(&self, index: &str, value: &Value) -> StoreResult<Vec<E>> {
        self.repo
            .query_by_index(E::KIND, index, value)?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Typed `latest_by_index`.
    pub fn latest_records<E: Entity>(&self, index: &str, limit: usize) -> StoreResult<Vec<E>> {
        self.repo
            .latest_by_index(E::KIND, index, limit)?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub fn list_records<E: Entity>(&self) -> StoreResult<Vec<E>> {
        self.repo
            .list(E::KIND)?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Inserts a client-supplied document after stamping missing timestamps.
    ///
    /// # Contract
    /// - `createdAt` and `lastEdited` default to `now_ms`.
    /// - `updatedAt` defaults to the effective `createdAt`.
    pub fn create_with_defaults(
        &self,
        kind: EntityKind,
        mut document: Document,
        now_ms: i64,
    ) -> StoreResult<Document> {
        let schema = schema_for(kind);
        if schema.has_field(CREATED_AT_FIELD) {
            fill_missing(&mut document, CREATED_AT_FIELD, Value::from(now_ms));
        }
        if schema.has_field(UPDATED_AT_FIELD) {
            let created = document
                .get(CREATED_AT_FIELD)
                .and_then(Value::as_i64)
                .unwrap_or(now_ms);
            fill_missing(&mut document, UPDATED_AT_FIELD, Value::from(created));
        }
        if schema.has_field(LAST_EDITED_FIELD) {
            fill_missing(&mut document, LAST_EDITED_FIELD, Value::from(now_ms));
        }
        self.repo.insert(kind, document)
    }

    /// Fully replaces a document, carrying `createdAt` forward.
    ///
    /// # Contract
    /// - Missing `createdAt` is copied from the stored record.
    /// - `updatedAt` becomes `max(now_ms, stored updatedAt)`.
    /// - `lastEdited` becomes `now_ms` when the kind declares it.
    /// - Returns `NotFound` when `id` does not exist.
    pub fn replace_with_defaults(
        &self,
        kind: EntityKind,
        id: &str,
        mut document: Document,
        now_ms: i64,
    ) -> StoreResult<Document> {
        let schema = schema_for(kind);
        let existing = self.repo.get_by_id(kind, id)?;

        if let Some(created) = existing.get(CREATED_AT_FIELD) {
            fill_missing(&mut document, CREATED_AT_FIELD, created.clone());
        }
        if schema.has_field(UPDATED_AT_FIELD) {
            let previous = existing
                .get(UPDATED_AT_FIELD)
                .and_then(Value::as_i64)
                .unwrap_or(now_ms);
            document.insert(
                UPDATED_AT_FIELD.to_string(),
                Value::from(now_ms.max(previous)),
            );
        }
        if schema.has_field(LAST_EDITED_FIELD) {
            document.insert(LAST_EDITED_FIELD.to_string(), Value::from(now_ms));
        }
        self.repo.update(kind, id, document)
    }
}

fn fill_missing(document: &mut Document, field: &str, value: Value) {
    match document.get(field) {
        None | Some(Value::Null) => {
            document.insert(field.to_string(), value);
        }
        Some(_) => {}
    }
}

fn decode<E: Entity>(document: Document) -> StoreResult<E> {
    from_document(document).map_err(|err| {
        StoreError::InvalidData(format!("cannot decode {} record: {err}", E::KIND))
    })
}

fn encode_error<E: Entity>(err: serde_json::Error) -> StoreError {
    StoreError::InvalidData(format!("cannot encode {} record: {err}", E::KIND))
}
