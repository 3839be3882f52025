use super::{read_body, write_body};
use crate::error::{ApiError, ApiResult, Envelope};
use crate::state::{now_ms, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde::Deserialize;
use serde_json::Value;

const MESSAGES: Envelope = Envelope::list("messages");
const MESSAGE: Envelope = Envelope::single("message");
const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, Deserialize)]
struct SendRequest {
    message: String,
}

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/chat-history", get(history))
        .route("/api/chat-send", post(send))
}

async fn history(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let messages = state.chat.history().await;
    let payload = serde_json::to_value(messages)
        .map_err(|err| ApiError::internal(MESSAGES, err.to_string()))?;
    Ok(read_body(MESSAGES, payload))
}

async fn send(
    State(state): State<AppState>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::unprocessable(MESSAGE, rejection.body_text()))?;
    let text = request.message.trim();
    if text.is_empty() {
        return Err(ApiError::unprocessable(MESSAGE, "message must not be blank"));
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::unprocessable(
            MESSAGE,
            format!("message exceeds {MAX_MESSAGE_CHARS} characters"),
        ));
    }

    let reply = state.chat.send(text, now_ms()).await;
    info!(
        "event=chat_send module=http status=ok id={} chars={}",
        reply.id,
        text.chars().count()
    );
    let payload =
        serde_json::to_value(reply).map_err(|err| ApiError::internal(MESSAGE, err.to_string()))?;
    Ok((StatusCode::CREATED, write_body(MESSAGE, payload)))
}
