//! Generic access routes over every entity kind.
//!
//! `{kind}` accepts the collection name (`calendarEvents`) or the table name
//! (`calendar_events`).

use super::{document_body, read_body, write_body};
use crate::error::{ApiError, ApiResult, Envelope};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use opsdeck_core::{schema_for, EntityKind, StoreError};
use serde_json::Value;

const RECORDS: Envelope = Envelope::list("records");
const RECORD: Envelope = Envelope::single("record");

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/store/{kind}", get(list_records).post(insert_record))
        .route(
            "/api/store/{kind}/{id}",
            get(get_record).put(replace_record),
        )
        .route(
            "/api/store/{kind}/index/{index}/{value}",
            get(query_records),
        )
}

fn parse_kind(envelope: Envelope, raw: &str) -> ApiResult<EntityKind> {
    EntityKind::parse(raw)
        .ok_or_else(|| ApiError::not_found(envelope, format!("unknown entity kind `{raw}`")))
}

async fn list_records(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<Json<Value>> {
    let kind = parse_kind(RECORDS, &kind)?;
    let documents = state.with_service(RECORDS, |service| service.list(kind))?;
    Ok(read_body(RECORDS, documents))
}

async fn insert_record(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let kind = parse_kind(RECORD, &kind)?;
    let document = document_body(RECORD, payload)?;
    let stored = state.with_service(RECORD, |service| service.insert(kind, document))?;
    Ok((StatusCode::CREATED, write_body(RECORD, stored)))
}

async fn get_record(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let kind = parse_kind(RECORD, &kind)?;
    let document = state.with_service(RECORD, |service| service.get_by_id(kind, &id))?;
    Ok(read_body(RECORD, document))
}

async fn replace_record(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let kind = parse_kind(RECORD, &kind)?;
    let document = document_body(RECORD, payload)?;
    let stored = state.with_service(RECORD, |service| service.update(kind, &id, document))?;
    Ok(write_body(RECORD, stored))
}

async fn query_records(
    State(state): State<AppState>,
    Path((kind, index, raw)): Path<(String, String, String)>,
) -> ApiResult<Json<Value>> {
    let kind = parse_kind(RECORDS, &kind)?;
    let value = schema_for(kind)
        .coerce_index_value(&index, &raw)
        .map_err(|err| ApiError::from_store(RECORDS, StoreError::Validation(err)))?;
    let documents = state.with_service(RECORDS, |service| {
        service.query_by_index(kind, &index, &value)
    })?;
    Ok(read_body(RECORDS, documents))
}
