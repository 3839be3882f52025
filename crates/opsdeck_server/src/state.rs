//! Shared handler state.
//!
//! # Invariants
//! - The store lock is never held across an `.await`.
//! - Handlers reach the store only through `with_service`.

use crate::activity::{ActivityFeed, FsActivitySource, GitActivitySource, StoreActivitySource};
use crate::chat::ChatLog;
use crate::error::{ApiError, ApiResult, Envelope};
use chrono::Utc;
use log::debug;
use opsdeck_core::{EntityService, EntityStore, SqliteEntityRepository, StoreResult};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub type SharedStore = Arc<Mutex<EntityStore>>;

pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_millis(1500);

/// Server-side knobs derived from the process configuration.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Free-form deployment label reported by `/api/system-state`.
    pub environment: String,
    /// CORS origins; empty allows any origin.
    pub allowed_origins: Vec<String>,
    pub source_timeout: Duration,
    pub activity_dir: Option<PathBuf>,
    pub git_repos: Vec<PathBuf>,
    pub chat_log: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            allowed_origins: Vec::new(),
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
            activity_dir: None,
            git_repos: Vec::new(),
            chat_log: None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub feed: Arc<ActivityFeed>,
    pub chat: Arc<ChatLog>,
    pub settings: Arc<ServerSettings>,
    pub started_at: Instant,
}

impl AppState {
    /// Wires the activity feed and chat log around an opened store.
    pub async fn new(store: EntityStore, settings: ServerSettings) -> Self {
        let store: SharedStore = Arc::new(Mutex::new(store));

        let mut feed = ActivityFeed::new(settings.source_timeout)
            .with_source(Arc::new(StoreActivitySource::new(Arc::clone(&store))));
        if let Some(dir) = &settings.activity_dir {
            feed = feed.with_source(Arc::new(FsActivitySource::new(dir.clone())));
        }
        if !settings.git_repos.is_empty() {
            feed = feed.with_source(Arc::new(GitActivitySource::new(settings.git_repos.clone())));
        }

        let chat = ChatLog::open(settings.chat_log.clone(), now_ms()).await;

        Self {
            store,
            feed: Arc::new(feed),
            chat: Arc::new(chat),
            settings: Arc::new(settings),
            started_at: Instant::now(),
        }
    }

    /// Runs `f` against an entity service bound to the shared store.
    ///
    /// Store errors are downgraded with `envelope`.
    pub fn with_service<T>(
        &self,
        envelope: Envelope,
        f: impl FnOnce(&EntityService<SqliteEntityRepository<'_>>) -> StoreResult<T>,
    ) -> ApiResult<T> {
        let started_at = Instant::now();
        let store = self
            .store
            .lock()
            .map_err(|_| ApiError::internal(envelope, "store lock poisoned"))?;
        let service = EntityService::new(store.repo());
        let result = f(&service).map_err(|err| ApiError::from_store(envelope, err));
        debug!(
            "event=store_call module=http status={} key={} duration_ms={}",
            if result.is_ok() { "ok" } else { "error" },
            envelope.key,
            started_at.elapsed().as_millis()
        );
        result
    }
}

/// Wall clock in Unix epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
