//! HTTP error downgrade.
//!
//! # Responsibility
//! - Map store errors to status codes.
//! - Render failures as the same envelope the route returns on success,
//!   with an empty fallback payload.
//!
//! # Invariants
//! - Error bodies are always `{ <key>: [] | null, "error": ..., "success": false }`.
//! - Internal failures never expose more than the error's display text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use opsdeck_core::StoreError;
use serde_json::{Map, Value};

/// Response key plus the empty payload used when the route fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    pub key: &'static str,
    list: bool,
}

impl Envelope {
    /// Collection envelope; failures carry `[]`.
    pub const fn list(key: &'static str) -> Self {
        Self { key, list: true }
    }

    /// Single-record envelope; failures carry `null`.
    pub const fn single(key: &'static str) -> Self {
        Self { key, list: false }
    }

    fn fallback(self) -> Value {
        if self.list {
            Value::Array(Vec::new())
        } else {
            Value::Null
        }
    }
}

/// Failed request, rendered with its route's envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub envelope: Envelope,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, envelope: Envelope, message: impl Into<String>) -> Self {
        Self {
            status,
            envelope,
            message: message.into(),
        }
    }

    pub fn unprocessable(envelope: Envelope, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, envelope, message)
    }

    pub fn not_found(envelope: Envelope, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, envelope, message)
    }

    pub fn internal(envelope: Envelope, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, envelope, message)
    }

    /// Downgrades a store error to its HTTP form.
    pub fn from_store(envelope: Envelope, err: StoreError) -> Self {
        let status = match &err {
            StoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::Conflict { .. } => StatusCode::CONFLICT,
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::Db(_) | StoreError::InvalidData(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, envelope, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                "event=api_error module=http status=error code={} key={} error={}",
                self.status.as_u16(),
                self.envelope.key,
                self.message
            );
        } else {
            warn!(
                "event=api_error module=http status=rejected code={} key={} error={}",
                self.status.as_u16(),
                self.envelope.key,
                self.message
            );
        }

        let mut body = Map::new();
        body.insert(self.envelope.key.to_string(), self.envelope.fallback());
        body.insert("error".to_string(), Value::String(self.message));
        body.insert("success".to_string(), Value::Bool(false));
        (self.status, Json(Value::Object(body))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::{ApiError, Envelope};
    use axum::http::StatusCode;
    use opsdeck_core::{EntityKind, StoreError, ValidationError};

    #[test]
    fn store_errors_map_to_status_codes() {
        let envelope = Envelope::single("task");
        let cases = [
            (
                StoreError::Validation(ValidationError::new(EntityKind::Tasks, "status", "bad")),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                StoreError::Conflict {
                    kind: EntityKind::Tasks,
                    id: "1".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                StoreError::NotFound {
                    kind: EntityKind::Tasks,
                    id: "1".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                StoreError::InvalidData("broken".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from_store(envelope, err).status, status);
        }
    }
}
