//! HTTP surface of the OpsDeck dashboard.
//!
//! # Responsibility
//! - Expose entity collections and derived snapshots as JSON routes.
//! - Compose file/process-backed activity sources behind one feed.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes an enveloped JSON error.
//! - The store is injected through `AppState`; no route keeps its own data.

pub mod activity;
pub mod chat;
pub mod error;
pub mod git;
mod routes;
pub mod state;

pub use activity::{ActivityFeed, ActivitySource, SourceError};
pub use chat::{ChatLog, ChatMessage};
pub use error::{ApiError, Envelope};
pub use state::{AppState, ServerSettings};

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::Router;
use log::{info, warn};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Builds the full router, CORS included.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.allowed_origins);
    routes::router(state).layer(cors)
}

/// Serves `state` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!("event=server_start module=http status=ok addr={addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=http status=ok addr={addr}");
    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let base = CorsLayer::new()
        .allow_methods(methods)
        .allow_headers([CONTENT_TYPE]);

    let origins = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("event=cors_origin module=http status=skipped origin={origin} error={err}");
                None
            }
        })
        .collect::<Vec<_>>();

    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(origins))
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=shutdown_signal module=http status=error error={err}");
        std::future::pending::<()>().await;
    }
    info!("event=shutdown_signal module=http status=ok");
}
