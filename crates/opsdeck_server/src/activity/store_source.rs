use super::{ActivitySource, SourceError};
use crate::state::SharedStore;
use async_trait::async_trait;
use opsdeck_core::{Activity, EntityService};

/// Activities persisted in the entity store, read newest first through the
/// `by_timestamp` index.
pub struct StoreActivitySource {
    store: SharedStore,
}

impl StoreActivitySource {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn load(&self, limit: usize) -> Result<Vec<Activity>, SourceError> {
        let store = self
            .store
            .lock()
            .map_err(|_| SourceError::Store("store lock poisoned".to_string()))?;
        let service = EntityService::new(store.repo());
        service
            .latest_records::<Activity>("by_timestamp", limit)
            .map_err(|err| SourceError::Store(err.to_string()))
    }
}

#[async_trait]
impl ActivitySource for StoreActivitySource {
    fn name(&self) -> &'static str {
        "store"
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<Activity>, SourceError> {
        self.load(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::StoreActivitySource;
    use crate::activity::ActivitySource;
    use opsdeck_core::{seed_kind, EntityKind, EntityStore};
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn reads_newest_seeded_activities_first() {
        let store = EntityStore::open_in_memory().unwrap();
        seed_kind(&store.repo(), EntityKind::Activities, 1_740_000_000_000).unwrap();
        let source = StoreActivitySource::new(Arc::new(Mutex::new(store)));

        let entries = source.fetch_recent(3).await.unwrap();
        let ids = entries
            .iter()
            .map(|entry| entry.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["act-1", "act-2", "act-3"]);
    }
}
