//! Declarative entity schema and document validation.
//!
//! # Responsibility
//! - Declare, per entity kind, the field set with type and optionality.
//! - Declare the secondary indexes usable for lookups.
//! - Validate schemaless documents before they reach storage.
//!
//! # Invariants
//! - Indexes are declarations; storage materializes them, this module never
//!   computes them.
//! - Validation fails on the first offending field and names it.
//! - Unknown fields are rejected.

mod catalog;

use crate::model::{Document, EntityKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use catalog::schema_for;

/// Field holding the record identifier in every kind.
pub const ID_FIELD: &str = "id";
/// Creation timestamp field, when declared by a kind.
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Last update timestamp field, when declared by a kind.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._:-]{0,127}$").expect("id pattern must compile")
});
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern must compile"));
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("date pattern must compile")
});
static TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("time pattern must compile"));

/// Value shape accepted for one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    /// Record identifier.
    Id,
    Text,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// Wall-clock time, `HH:MM`.
    Time,
    Email,
    /// Whole number within optional inclusive bounds.
    Integer { min: Option<i64>, max: Option<i64> },
    /// Finite number, integral or fractional, with an optional lower bound.
    Number { min: Option<f64> },
    /// List of non-blank strings.
    TextList,
    /// One of a closed set of literals.
    Enum(&'static [&'static str]),
    /// Any JSON value.
    Any,
}

/// One declared field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
}

/// One declared secondary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    /// Lookup name, e.g. `by_status`.
    pub name: &'static str,
    /// Indexed document field.
    pub field: &'static str,
    /// Storage column holding the extracted field value.
    pub column: &'static str,
}

/// Field set and index declarations for one entity kind.
#[derive(Debug)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub fields: &'static [FieldSpec],
    pub indexes: &'static [IndexSpec],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn index(&self, name: &str) -> Option<&IndexSpec> {
        self.indexes.iter().find(|index| index.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Validates one document against this schema.
    ///
    /// # Errors
    /// - Returns `ValidationError` naming the first offending field.
    pub fn validate(&self, document: &Document) -> Result<(), ValidationError> {
        if let Some(unknown) = document.keys().find(|key| !self.has_field(key)) {
            return Err(self.error(unknown, "field is not declared for this kind"));
        }

        for field in self.fields {
            match document.get(field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(self.error(field.name, "required field is missing"));
                }
                None | Some(Value::Null) => {}
                Some(value) => self.check_value(field, value)?,
            }
        }

        let created = document.get(CREATED_AT_FIELD).and_then(Value::as_i64);
        let updated = document.get(UPDATED_AT_FIELD).and_then(Value::as_i64);
        if let (Some(created), Some(updated)) = (created, updated) {
            if updated < created {
                return Err(self.error(
                    UPDATED_AT_FIELD,
                    format!("must not be earlier than createdAt ({updated} < {created})"),
                ));
            }
        }

        Ok(())
    }

    /// Converts a textual lookup value into the JSON value stored for `index`.
    ///
    /// Used by callers that only have strings (URL paths, query strings).
    ///
    /// # Errors
    /// - Unknown index name.
    /// - Value not parseable as the indexed field's type.
    pub fn coerce_index_value(&self, index: &str, raw: &str) -> Result<Value, ValidationError> {
        let spec = self
            .index(index)
            .ok_or_else(|| self.error("index", format!("unknown index `{index}`")))?;
        let field = self
            .field(spec.field)
            .ok_or_else(|| self.error(spec.field, "index refers to an undeclared field"))?;

        match field.ty {
            FieldType::Integer { .. } => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| self.error(spec.field, format!("expected an integer, got `{raw}`"))),
            FieldType::Number { .. } => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| self.error(spec.field, format!("expected a number, got `{raw}`"))),
            FieldType::Enum(literals) if !literals.contains(&raw) => Err(self.error(
                spec.field,
                format!("expected one of {}, got `{raw}`", literals.join("|")),
            )),
            _ => Ok(Value::String(raw.to_string())),
        }
    }

    fn check_value(&self, field: &FieldSpec, value: &Value) -> Result<(), ValidationError> {
        match field.ty {
            FieldType::Id => {
                let text = self.expect_str(field, value)?;
                if !ID_PATTERN.is_match(text) {
                    return Err(self.error(field.name, format!("invalid identifier `{text}`")));
                }
            }
            FieldType::Text => {
                self.expect_str(field, value)?;
            }
            FieldType::Date => {
                let text = self.expect_str(field, value)?;
                if !DATE_PATTERN.is_match(text) {
                    return Err(self.error(field.name, format!("expected YYYY-MM-DD, got `{text}`")));
                }
            }
            FieldType::Time => {
                let text = self.expect_str(field, value)?;
                if !TIME_PATTERN.is_match(text) {
                    return Err(self.error(field.name, format!("expected HH:MM, got `{text}`")));
                }
            }
            FieldType::Email => {
                let text = self.expect_str(field, value)?;
                if !EMAIL_PATTERN.is_match(text) {
                    return Err(self.error(field.name, format!("invalid email address `{text}`")));
                }
            }
            FieldType::Integer { min, max } => {
                let number = value
                    .as_i64()
                    .ok_or_else(|| self.error(field.name, "expected an integer"))?;
                if let Some(min) = min.filter(|min| number < *min) {
                    return Err(self.error(field.name, format!("must be >= {min}, got {number}")));
                }
                if let Some(max) = max.filter(|max| number > *max) {
                    return Err(self.error(field.name, format!("must be <= {max}, got {number}")));
                }
            }
            FieldType::Number { min } => {
                let number = value
                    .as_f64()
                    .filter(|number| number.is_finite())
                    .ok_or_else(|| self.error(field.name, "expected a number"))?;
                if let Some(min) = min.filter(|min| number < *min) {
                    return Err(self.error(field.name, format!("must be >= {min}, got {number}")));
                }
            }
            FieldType::TextList => {
                let items = value
                    .as_array()
                    .ok_or_else(|| self.error(field.name, "expected a list of strings"))?;
                for item in items {
                    match item.as_str() {
                        Some(text) if !text.trim().is_empty() => {}
                        Some(_) => {
                            return Err(self.error(field.name, "list entries must not be blank"))
                        }
                        None => return Err(self.error(field.name, "expected a list of strings")),
                    }
                }
            }
            FieldType::Enum(literals) => {
                let text = self.expect_str(field, value)?;
                if !literals.contains(&text) {
                    return Err(self.error(
                        field.name,
                        format!("expected one of {}, got `{text}`", literals.join("|")),
                    ));
                }
            }
            FieldType::Any => {}
        }
        Ok(())
    }

    fn expect_str<'v>(
        &self,
        field: &FieldSpec,
        value: &'v Value,
    ) -> Result<&'v str, ValidationError> {
        value
            .as_str()
            .ok_or_else(|| self.error(field.name, "expected a string"))
    }

    fn error(&self, field: &str, message: impl Into<String>) -> ValidationError {
        ValidationError {
            kind: self.kind,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Schema mismatch for one field of one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: EntityKind,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: EntityKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}.{}: {}", self.kind, self.field, self.message)
    }
}

impl Error for ValidationError {}

/// Validates `document` against the schema declared for `kind`.
pub fn validate(kind: EntityKind, document: &Document) -> Result<(), ValidationError> {
    schema_for(kind).validate(document)
}

#[cfg(test)]
mod tests {
    use super::{schema_for, validate, FieldType};
    use crate::model::task::TaskStatus;
    use crate::model::{Document, EntityKind};
    use serde_json::{json, Value};

    fn task_document() -> Document {
        match json!({
            "id": "t-1",
            "title": "Fix login bug",
            "description": "Users unable to login with SSO",
            "priority": "high",
            "status": "today",
            "tags": ["bug"],
            "project": "Frontend",
            "createdAt": 1_000,
            "updatedAt": 2_000
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn accepts_well_formed_task() {
        validate(EntityKind::Tasks, &task_document()).expect("task should validate");
    }

    #[test]
    fn rejects_status_outside_closed_set() {
        let mut document = task_document();
        document.insert("status".to_string(), json!("archived"));
        let err = validate(EntityKind::Tasks, &document).expect_err("archived must fail");
        assert_eq!(err.field, "status");
        assert!(err.message.contains("archived"));
    }

    #[test]
    fn rejects_missing_required_field_and_null_required_field() {
        let mut document = task_document();
        document.remove("project");
        let err = validate(EntityKind::Tasks, &document).expect_err("missing project");
        assert_eq!(err.field, "project");

        let mut document = task_document();
        document.insert("title".to_string(), Value::Null);
        let err = validate(EntityKind::Tasks, &document).expect_err("null title");
        assert_eq!(err.field, "title");
    }

    #[test]
    fn optional_fields_accept_null() {
        let mut document = task_document();
        document.insert("assignee".to_string(), Value::Null);
        validate(EntityKind::Tasks, &document).expect("null assignee is allowed");
    }

    #[test]
    fn rejects_unknown_field() {
        let mut document = task_document();
        document.insert("color".to_string(), json!("blue"));
        let err = validate(EntityKind::Tasks, &document).expect_err("unknown field");
        assert_eq!(err.field, "color");
    }

    #[test]
    fn rejects_updated_before_created() {
        let mut document = task_document();
        document.insert("updatedAt".to_string(), json!(10));
        let err = validate(EntityKind::Tasks, &document).expect_err("reversed timestamps");
        assert_eq!(err.field, "updatedAt");
    }

    #[test]
    fn rejects_blank_tag_and_bad_id() {
        let mut document = task_document();
        document.insert("tags".to_string(), json!(["ok", "  "]));
        assert_eq!(
            validate(EntityKind::Tasks, &document).unwrap_err().field,
            "tags"
        );

        let mut document = task_document();
        document.insert("id".to_string(), json!("has space"));
        assert_eq!(validate(EntityKind::Tasks, &document).unwrap_err().field, "id");
    }

    fn contact_document() -> Document {
        match json!({
            "id": "c-1",
            "name": "Ana Ruiz",
            "company": "Acme",
            "email": "ana@acme.io",
            "status": "proposal",
            "value": 1500.5,
            "lastContact": "today",
            "nextAction": "Send contract",
            "tags": [],
            "location": "Lisbon",
            "createdAt": 1_000
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn money_fields_accept_fractional_amounts() {
        validate(EntityKind::Contacts, &contact_document()).expect("fractional deal value");

        let mut document = contact_document();
        document.insert("value".to_string(), json!(42));
        validate(EntityKind::Contacts, &document).expect("integral deal value");
    }

    #[test]
    fn money_fields_reject_negative_and_non_numeric_amounts() {
        let mut document = contact_document();
        document.insert("value".to_string(), json!(-0.5));
        let err = validate(EntityKind::Contacts, &document).expect_err("negative value");
        assert_eq!(err.field, "value");

        let mut document = contact_document();
        document.insert("value".to_string(), json!("1500"));
        let err = validate(EntityKind::Contacts, &document).expect_err("string value");
        assert_eq!(err.field, "value");
        assert!(err.message.contains("number"));
    }

    #[test]
    fn coerces_index_values_by_field_type() {
        let activities = schema_for(EntityKind::Activities);
        assert_eq!(
            activities
                .coerce_index_value("by_timestamp", "1700000000000")
                .unwrap(),
            json!(1_700_000_000_000_i64)
        );
        assert!(activities.coerce_index_value("by_timestamp", "soon").is_err());

        let tasks = schema_for(EntityKind::Tasks);
        assert_eq!(
            tasks.coerce_index_value("by_status", "done").unwrap(),
            json!("done")
        );
        assert_eq!(
            tasks
                .coerce_index_value("by_status", "archived")
                .unwrap_err()
                .field,
            "status"
        );
        assert_eq!(
            tasks.coerce_index_value("by_color", "x").unwrap_err().field,
            "index"
        );
    }

    #[test]
    fn enum_fields_reuse_model_literals() {
        let status = schema_for(EntityKind::Tasks)
            .field("status")
            .expect("status declared");
        assert_eq!(status.ty, FieldType::Enum(TaskStatus::LITERALS));
        for literal in TaskStatus::LITERALS {
            let parsed = TaskStatus::parse(literal).expect("literal parses");
            assert_eq!(
                serde_json::to_value(parsed).unwrap(),
                Value::String((*literal).to_string())
            );
        }
    }
}
