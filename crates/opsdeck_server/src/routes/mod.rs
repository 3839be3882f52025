//! Route table of the HTTP surface.
//!
//! # Responsibility
//! - Assemble per-area routers into one `Router` over `AppState`.
//! - Provide request-body helpers shared by write routes.
//!
//! # Invariants
//! - Every route answers with a JSON object; failures use the route's
//!   envelope (see `error`).

mod agents;
mod chat;
mod entities;
mod monitoring;
mod snapshots;
mod store;

use crate::error::{ApiError, ApiResult, Envelope};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use axum::Router;
use opsdeck_core::Document;
use serde_json::{Map, Value};

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(entities::routes())
        .merge(store::routes())
        .merge(snapshots::routes())
        .merge(monitoring::routes())
        .merge(agents::routes())
        .merge(chat::routes())
        .with_state(state)
}

/// `{ <key>: payload }`
pub(crate) fn read_body(envelope: Envelope, payload: impl Into<Value>) -> Json<Value> {
    let mut body = Map::new();
    body.insert(envelope.key.to_string(), payload.into());
    Json(Value::Object(body))
}

/// `{ <key>: payload, "success": true }`
pub(crate) fn write_body(envelope: Envelope, payload: impl Into<Value>) -> Json<Value> {
    let Json(mut body) = read_body(envelope, payload);
    if let Value::Object(map) = &mut body {
        map.insert("success".to_string(), Value::Bool(true));
    }
    Json(body)
}

/// Unwraps a JSON body that must be an object.
pub(crate) fn document_body(
    envelope: Envelope,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Document> {
    match payload {
        Ok(Json(Value::Object(document))) => Ok(document),
        Ok(Json(_)) => Err(ApiError::unprocessable(
            envelope,
            "request body must be a JSON object",
        )),
        Err(rejection) => Err(ApiError::unprocessable(envelope, rejection.body_text())),
    }
}
