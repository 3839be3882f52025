//! Owned entity store with an explicit lifecycle.
//!
//! # Responsibility
//! - Own one migrated SQLite connection.
//! - Hand out repositories bound to that connection.
//! - Provide `reset` so tests and demos can start from an empty store.
//!
//! # Invariants
//! - A store is usable only after `open`/`open_in_memory` returned `Ok`.
//! - `reset` removes records of every kind in one transaction; schema and
//!   indexes are kept.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::EntityKind;
use crate::repo::entity_repo::{SqliteEntityRepository, StoreResult};
use log::info;
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Entity store backed by one SQLite connection.
pub struct EntityStore {
    conn: Connection,
}

impl EntityStore {
    /// Opens (or creates) a file-backed store and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Creates an isolated in-memory store.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Returns a repository bound to this store's connection.
    pub fn repo(&self) -> SqliteEntityRepository<'_> {
        SqliteEntityRepository::new(&self.conn)
    }

    /// Deletes every record of every kind.
    pub fn reset(&mut self) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        for kind in EntityKind::ALL {
            tx.execute(&format!("DELETE FROM {};", kind.table()), [])?;
        }
        tx.commit()?;
        info!("event=store_reset module=store status=ok");
        Ok(())
    }

    /// Round-trips a trivial query and returns its latency.
    pub fn ping(&self) -> StoreResult<Duration> {
        let started_at = Instant::now();
        self.conn.query_row("SELECT 1;", [], |row| row.get::<_, i64>(0))?;
        Ok(started_at.elapsed())
    }
}
