//! Activity feed composed from independent sources.
//!
//! # Responsibility
//! - Define the `ActivitySource` capability.
//! - Merge source results into one newest-first feed.
//!
//! # Invariants
//! - A failing or slow source contributes nothing; it never fails the feed.
//! - Every source runs under the same bounded timeout.
//! - Feed order is timestamp descending, ties by id ascending.

mod fs_source;
mod git_source;
mod store_source;

pub use fs_source::FsActivitySource;
pub use git_source::GitActivitySource;
pub use store_source::StoreActivitySource;

use async_trait::async_trait;
use log::{debug, warn};
use opsdeck_core::Activity;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Failure of a single activity source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("`{command}` exited with {status}: {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("unparseable output: {0}")]
    Parse(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// One origin of recent activity.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Stable label used in logs.
    fn name(&self) -> &'static str;

    /// Returns at most `limit` entries, newest first.
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<Activity>, SourceError>;
}

/// Fan-out over every registered source.
pub struct ActivityFeed {
    sources: Vec<Arc<dyn ActivitySource>>,
    timeout: Duration,
}

impl ActivityFeed {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            timeout,
        }
    }

    pub fn with_source(mut self, source: Arc<dyn ActivitySource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Fetches from every source concurrently and merges the results.
    pub async fn recent(&self, limit: usize) -> Vec<Activity> {
        let mut tasks = JoinSet::new();
        for source in &self.sources {
            let source = Arc::clone(source);
            let timeout = self.timeout;
            tasks.spawn(async move {
                let started_at = Instant::now();
                let result = match tokio::time::timeout(timeout, source.fetch_recent(limit)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(SourceError::Timeout(timeout)),
                };
                (source.name(), started_at.elapsed(), result)
            });
        }

        let mut merged = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, elapsed, Ok(entries))) => {
                    debug!(
                        "event=activity_fetch module=activity status=ok source={} count={} duration_ms={}",
                        name,
                        entries.len(),
                        elapsed.as_millis()
                    );
                    merged.extend(entries);
                }
                Ok((name, elapsed, Err(err))) => {
                    warn!(
                        "event=activity_fetch module=activity status=error source={} duration_ms={} error={}",
                        name,
                        elapsed.as_millis(),
                        err
                    );
                }
                Err(err) => {
                    warn!(
                        "event=activity_fetch module=activity status=error source=unknown error={}",
                        err
                    );
                }
            }
        }

        sort_newest_first(&mut merged);
        merged.truncate(limit);
        merged
    }
}

pub(crate) fn sort_newest_first(entries: &mut [Activity]) {
    entries.sort_by(|left, right| {
        right
            .timestamp
            .cmp(&left.timestamp)
            .then_with(|| left.id.cmp(&right.id))
    });
}

#[cfg(test)]
mod tests {
    use super::{ActivityFeed, ActivitySource, SourceError};
    use async_trait::async_trait;
    use opsdeck_core::{Activity, ActivityKind};
    use std::sync::Arc;
    use std::time::Duration;

    struct Fixed(Vec<(&'static str, i64)>);

    #[async_trait]
    impl ActivitySource for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch_recent(&self, _limit: usize) -> Result<Vec<Activity>, SourceError> {
            Ok(self
                .0
                .iter()
                .map(|(id, timestamp)| Activity {
                    id: (*id).to_string(),
                    kind: ActivityKind::System,
                    message: format!("entry {id}"),
                    timestamp: *timestamp,
                    metadata: None,
                })
                .collect())
        }
    }

    struct Failing;

    #[async_trait]
    impl ActivitySource for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch_recent(&self, _limit: usize) -> Result<Vec<Activity>, SourceError> {
            Err(SourceError::Parse("garbage".to_string()))
        }
    }

    struct Stalled;

    #[async_trait]
    impl ActivitySource for Stalled {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn fetch_recent(&self, _limit: usize) -> Result<Vec<Activity>, SourceError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn merges_sources_newest_first_and_truncates() {
        let feed = ActivityFeed::new(Duration::from_millis(200))
            .with_source(Arc::new(Fixed(vec![("a", 10), ("b", 30)])))
            .with_source(Arc::new(Fixed(vec![("c", 20), ("d", 30)])));

        let ids = feed
            .recent(3)
            .await
            .into_iter()
            .map(|entry| entry.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["b", "d", "c"]);
    }

    #[tokio::test]
    async fn failing_and_stalled_sources_are_soft_failures() {
        let feed = ActivityFeed::new(Duration::from_millis(50))
            .with_source(Arc::new(Failing))
            .with_source(Arc::new(Stalled))
            .with_source(Arc::new(Fixed(vec![("ok", 1)])));

        let entries = feed.recent(10).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "ok");
    }
}
