//! Per-collection routes used by the dashboard views.

use super::{document_body, read_body, write_body};
use crate::error::{ApiError, ApiResult, Envelope};
use crate::state::{now_ms, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use log::info;
use opsdeck_core::{EntityKind, Task};
use serde_json::{json, Value};

const TASKS: Envelope = Envelope::list("tasks");
const TASK: Envelope = Envelope::single("task");
const CONTACTS: Envelope = Envelope::list("contacts");
const CONTACT: Envelope = Envelope::single("contact");
const CLIENTS: Envelope = Envelope::list("clients");
const DRAFTS: Envelope = Envelope::list("drafts");
const DRAFT: Envelope = Envelope::single("draft");
const EVENTS: Envelope = Envelope::list("events");
const EVENT: Envelope = Envelope::single("event");
const PRODUCTS: Envelope = Envelope::list("products");
const PRODUCT: Envelope = Envelope::single("product");

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}", put(replace_task).delete(remove_task))
        .route("/api/suggested-tasks", get(suggested_tasks))
        .route("/api/contacts", get(list_contacts).post(create_contact))
        .route("/api/clients", get(list_clients))
        .route(
            "/api/content-pipeline",
            get(list_drafts).post(create_draft),
        )
        .route("/api/calendar", get(list_events).post(create_event))
        .route("/api/ecosystem", get(list_products))
        .route("/api/ecosystem/{slug}", get(get_product))
}

fn list_kind(state: &AppState, kind: EntityKind, envelope: Envelope) -> ApiResult<Json<Value>> {
    let documents = state.with_service(envelope, |service| service.list(kind))?;
    Ok(read_body(envelope, documents))
}

fn create_kind(
    state: &AppState,
    kind: EntityKind,
    envelope: Envelope,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let document = document_body(envelope, payload)?;
    let stored = state.with_service(envelope, |service| {
        service.create_with_defaults(kind, document, now_ms())
    })?;
    info!(
        "event=entity_create module=http status=ok kind={} id={}",
        kind,
        stored.get("id").and_then(Value::as_str).unwrap_or_default()
    );
    Ok((StatusCode::CREATED, write_body(envelope, stored)))
}

async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    list_kind(&state, EntityKind::Tasks, TASKS)
}

async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    create_kind(&state, EntityKind::Tasks, TASK, payload)
}

async fn replace_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let document = document_body(TASK, payload)?;
    let stored = state.with_service(TASK, |service| {
        service.replace_with_defaults(EntityKind::Tasks, &id, document, now_ms())
    })?;
    info!("event=entity_replace module=http status=ok kind=tasks id={id}");
    Ok(write_body(TASK, stored))
}

async fn remove_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let envelope = Envelope::single("id");
    state.with_service(envelope, |service| {
        service.remove(EntityKind::Tasks, &id)
    })?;
    info!("event=entity_remove module=http status=ok kind=tasks id={id}");
    Ok(write_body(envelope, id))
}

/// Tasks that still need work, in board order.
async fn suggested_tasks(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let open = state.with_service(TASKS, |service| {
        Ok(service
            .list_records::<Task>()?
            .into_iter()
            .filter(Task::is_open)
            .collect::<Vec<_>>())
    })?;
    let payload = serde_json::to_value(open)
        .map_err(|err| ApiError::internal(TASKS, err.to_string()))?;
    Ok(read_body(TASKS, payload))
}

async fn list_contacts(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    list_kind(&state, EntityKind::Contacts, CONTACTS)
}

/// CRM view of the contact collection.
async fn list_clients(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    list_kind(&state, EntityKind::Contacts, CLIENTS)
}

async fn create_contact(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    create_kind(&state, EntityKind::Contacts, CONTACT, payload)
}

async fn list_drafts(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    list_kind(&state, EntityKind::ContentDrafts, DRAFTS)
}

async fn create_draft(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    create_kind(&state, EntityKind::ContentDrafts, DRAFT, payload)
}

async fn list_events(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    list_kind(&state, EntityKind::CalendarEvents, EVENTS)
}

async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    create_kind(&state, EntityKind::CalendarEvents, EVENT, payload)
}

async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    list_kind(&state, EntityKind::EcosystemProducts, PRODUCTS)
}

async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Value>> {
    let product = state
        .with_service(PRODUCT, |service| {
            service.get_by_id(EntityKind::EcosystemProducts, &slug)
        })
        .map_err(|err| {
            if err.status == StatusCode::NOT_FOUND {
                ApiError::not_found(PRODUCT, "Product not found")
            } else {
                err
            }
        })?;
    Ok(Json(json!({ "product": product })))
}
