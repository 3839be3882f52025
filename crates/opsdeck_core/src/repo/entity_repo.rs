//! Entity repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the only sanctioned create/read/replace/remove paths for
//!   entity documents.
//! - Keep declared indexes in sync with stored documents.
//!
//! # Invariants
//! - Write paths validate against `schema` before any SQL mutation.
//! - A failed write leaves the table unchanged.
//! - Index lookups and listings return documents in insertion order.
//! - Read paths reject malformed persisted documents instead of masking them.

use crate::db::DbError;
use crate::model::{Document, EntityKind};
use crate::schema::{
    schema_for, EntitySchema, ValidationError, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD,
};
use log::debug;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, ErrorCode, OptionalExtension};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error taxonomy of the entity access API.
#[derive(Debug)]
pub enum StoreError {
    /// Malformed, missing or out-of-range field.
    Validation(ValidationError),
    /// Duplicate identifier on insert.
    Conflict { kind: EntityKind, id: String },
    /// Lookup miss on a required read.
    NotFound { kind: EntityKind, id: String },
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict { kind, id } => write!(f, "{kind} record already exists: {id}"),
            Self::NotFound { kind, id } => write!(f, "{kind} record not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Conflict { .. } | Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for entity documents.
pub trait EntityRepository {
    /// Validates and appends one document, assigning an id when absent.
    ///
    /// Returns the stored document.
    fn insert(&self, kind: EntityKind, document: Document) -> StoreResult<Document>;

    fn get_by_id(&self, kind: EntityKind, id: &str) -> StoreResult<Document>;

    /// Returns every document whose indexed field equals `value`.
    ///
    /// `Value::Null` matches documents where the field is absent.
    fn query_by_index(
        &self,
        kind: EntityKind,
        index: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>>;

    fn list(&self, kind: EntityKind) -> StoreResult<Vec<Document>>;

    /// Returns up to `limit` documents ordered by the indexed field, highest
    /// first. Ties keep insertion order; documents without the field come last.
    fn latest_by_index(
        &self,
        kind: EntityKind,
        index: &str,
        limit: usize,
    ) -> StoreResult<Vec<Document>>;

    /// Replaces the whole document stored under `id`.
    ///
    /// `createdAt` cannot change and `updatedAt` cannot move backwards.
    fn update(&self, kind: EntityKind, id: &str, document: Document) -> StoreResult<Document>;

    fn remove(&self, kind: EntityKind, id: &str) -> StoreResult<()>;

    fn count(&self, kind: EntityKind) -> StoreResult<u64>;
}

/// SQLite-backed entity repository.
pub struct SqliteEntityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntityRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntityRepository for SqliteEntityRepository<'_> {
    fn insert(&self, kind: EntityKind, mut document: Document) -> StoreResult<Document> {
        let schema = schema_for(kind);
        if needs_generated_id(&document) {
            document.insert(
                ID_FIELD.to_string(),
                Value::String(Uuid::new_v4().to_string()),
            );
        }
        schema.validate(&document)?;
        let id = document_id(kind, &document)?;

        if self.exists(kind, &id)? {
            return Err(StoreError::Conflict { kind, id });
        }

        let index_columns = schema
            .indexes
            .iter()
            .map(|index| index.column)
            .collect::<Vec<_>>();
        let placeholders = (0..index_columns.len() + 2)
            .map(|position| format!("?{}", position + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let mut columns = vec!["id", "document"];
        columns.extend(index_columns);
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders});",
            kind.table(),
            columns.join(", ")
        );

        let bind_values = write_bind_values(schema, &id, &document)?;
        match self.conn.execute(&sql, params_from_iter(bind_values)) {
            Ok(_) => {}
            Err(err) if is_constraint_violation(&err) => {
                return Err(StoreError::Conflict { kind, id });
            }
            Err(err) => return Err(err.into()),
        }

        debug!("event=entity_insert module=repo status=ok kind={kind} id={id}");
        Ok(document)
    }

    fn get_by_id(&self, kind: EntityKind, id: &str) -> StoreResult<Document> {
        let text = self
            .conn
            .query_row(
                &format!("SELECT document FROM {} WHERE id = ?1;", kind.table()),
                [id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        match text {
            Some(text) => parse_document(kind, &text),
            None => Err(StoreError::NotFound {
                kind,
                id: id.to_string(),
            }),
        }
    }

    fn query_by_index(
        &self,
        kind: EntityKind,
        index: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        let schema = schema_for(kind);
        let spec = schema.index(index).ok_or_else(|| {
            ValidationError::new(kind, "index", format!("unknown index `{index}`"))
        })?;

        let sql = format!(
            "SELECT document FROM {} WHERE {} IS ?1 ORDER BY seq ASC;",
            kind.table(),
            spec.column
        );
        self.collect_documents(kind, &sql, vec![index_value(Some(value))])
    }

    fn list(&self, kind: EntityKind) -> StoreResult<Vec<Document>> {
        let sql = format!("SELECT document FROM {} ORDER BY seq ASC;", kind.table());
        self.collect_documents(kind, &sql, Vec::new())
    }

    fn latest_by_index(
        &self,
        kind: EntityKind,
        index: &str,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        let spec = schema_for(kind).index(index).ok_or_else(|| {
            ValidationError::new(kind, "index", format!("unknown index `{index}`"))
        })?;

        let sql = format!(
            "SELECT document FROM {} ORDER BY {} DESC, seq ASC LIMIT ?1;",
            kind.table(),
            spec.column
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.collect_documents(kind, &sql, vec![SqlValue::Integer(limit)])
    }

    fn update(&self, kind: EntityKind, id: &str, mut document: Document) -> StoreResult<Document> {
        let schema = schema_for(kind);
        match document.get(ID_FIELD) {
            None | Some(Value::Null) => {
                document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
            }
            Some(Value::String(body_id)) if body_id == id => {}
            Some(_) => {
                return Err(ValidationError::new(
                    kind,
                    ID_FIELD,
                    format!("body id does not match `{id}`"),
                )
                .into());
            }
        }
        schema.validate(&document)?;

        let tx = self.conn.unchecked_transaction()?;
        let existing = self.get_by_id(kind, id)?;
        check_timestamps_monotonic(kind, &existing, &document)?;

        let assignments = schema
            .indexes
            .iter()
            .enumerate()
            .map(|(position, index)| format!("{} = ?{}", index.column, position + 3))
            .collect::<Vec<_>>();
        let mut sql = format!("UPDATE {} SET document = ?2", kind.table());
        for assignment in assignments {
            sql.push_str(", ");
            sql.push_str(&assignment);
        }
        sql.push_str(" WHERE id = ?1;");

        let bind_values = write_bind_values(schema, id, &document)?;
        tx.execute(&sql, params_from_iter(bind_values))?;
        tx.commit()?;

        debug!("event=entity_update module=repo status=ok kind={kind} id={id}");
        Ok(document)
    }

    fn remove(&self, kind: EntityKind, id: &str) -> StoreResult<()> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", kind.table()),
            [id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind,
                id: id.to_string(),
            });
        }

        debug!("event=entity_remove module=repo status=ok kind={kind} id={id}");
        Ok(())
    }

    fn count(&self, kind: EntityKind) -> StoreResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", kind.table()),
            [],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("negative row count {count}")))
    }
}

impl SqliteEntityRepository<'_> {
    fn exists(&self, kind: EntityKind, id: &str) -> StoreResult<bool> {
        let exists: i64 = self.conn.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);",
                kind.table()
            ),
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn collect_documents(
        &self,
        kind: EntityKind,
        sql: &str,
        bind_values: Vec<SqlValue>,
    ) -> StoreResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            documents.push(parse_document(kind, &text)?);
        }
        Ok(documents)
    }
}

fn needs_generated_id(document: &Document) -> bool {
    match document.get(ID_FIELD) {
        None | Some(Value::Null) => true,
        Some(Value::String(id)) => id.trim().is_empty(),
        Some(_) => false,
    }
}

fn document_id(kind: EntityKind, document: &Document) -> StoreResult<String> {
    document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ValidationError::new(kind, ID_FIELD, "expected a string").into())
}

/// Bind order: id, document, then one value per declared index.
fn write_bind_values(
    schema: &EntitySchema,
    id: &str,
    document: &Document,
) -> StoreResult<Vec<SqlValue>> {
    let text = serde_json::to_string(document)
        .map_err(|err| StoreError::InvalidData(format!("cannot encode document: {err}")))?;
    let mut values = vec![SqlValue::Text(id.to_string()), SqlValue::Text(text)];
    values.extend(
        schema
            .indexes
            .iter()
            .map(|index| index_value(document.get(index.field))),
    );
    Ok(values)
}

fn index_value(value: Option<&Value>) -> SqlValue {
    match value {
        None | Some(Value::Null) => SqlValue::Null,
        Some(Value::String(text)) => SqlValue::Text(text.clone()),
        Some(Value::Bool(flag)) => SqlValue::Integer(i64::from(*flag)),
        Some(Value::Number(number)) => match (number.as_i64(), number.as_f64()) {
            (Some(integer), _) => SqlValue::Integer(integer),
            (None, Some(real)) => SqlValue::Real(real),
            (None, None) => SqlValue::Null,
        },
        Some(other) => SqlValue::Text(other.to_string()),
    }
}

fn check_timestamps_monotonic(
    kind: EntityKind,
    existing: &Document,
    replacement: &Document,
) -> StoreResult<()> {
    let previous_created = existing.get(CREATED_AT_FIELD).and_then(Value::as_i64);
    let next_created = replacement.get(CREATED_AT_FIELD).and_then(Value::as_i64);
    if previous_created.is_some() && previous_created != next_created {
        return Err(ValidationError::new(kind, CREATED_AT_FIELD, "createdAt is immutable").into());
    }

    let previous_updated = existing.get(UPDATED_AT_FIELD).and_then(Value::as_i64);
    let next_updated = replacement.get(UPDATED_AT_FIELD).and_then(Value::as_i64);
    if let (Some(previous), Some(next)) = (previous_updated, next_updated) {
        if next < previous {
            return Err(ValidationError::new(
                kind,
                UPDATED_AT_FIELD,
                format!("must not move backwards ({next} < {previous})"),
            )
            .into());
        }
    }
    Ok(())
}

fn parse_document(kind: EntityKind, text: &str) -> StoreResult<Document> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StoreError::InvalidData(format!(
            "{kind} document is not a JSON object"
        ))),
        Err(err) => Err(StoreError::InvalidData(format!(
            "{kind} document is not valid JSON: {err}"
        ))),
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation
    )
}
