//! Seed loader for demo fixtures.
//!
//! # Responsibility
//! - Populate an empty store with a fixed, deterministic fixture set.
//!
//! # Invariants
//! - Records are inserted one by one through the repository, in list order,
//!   kinds in `EntityKind::ALL` order.
//! - The first failed insert aborts the run; earlier inserts are kept.
//! - Seeding is not idempotent: a second run on the same store fails with a
//!   conflict on the first fixture id.

pub mod fixtures;

use crate::model::{to_document, Document, Entity, EntityKind};
use crate::repo::entity_repo::{EntityRepository, StoreError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Per-kind insert counts of one seed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: Vec<(EntityKind, usize)>,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.inserted.iter().map(|(_, count)| count).sum()
    }

    pub fn count_for(&self, kind: EntityKind) -> usize {
        self.inserted
            .iter()
            .find(|(seeded, _)| *seeded == kind)
            .map_or(0, |(_, count)| *count)
    }
}

/// Seed failure with the position of the offending fixture.
#[derive(Debug)]
pub struct SeedError {
    pub kind: EntityKind,
    /// Zero-based index into the fixture list of `kind`.
    pub position: usize,
    pub source: StoreError,
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "seeding {} failed at fixture #{}: {}",
            self.kind, self.position, self.source
        )
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Seeds every kind, anchoring relative timestamps at `now_ms`.
pub fn seed_all<R: EntityRepository>(repo: &R, now_ms: i64) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();
    for kind in EntityKind::ALL {
        let count = seed_kind(repo, kind, now_ms)?;
        report.inserted.push((kind, count));
    }
    info!(
        "event=seed_all module=seed status=ok total={}",
        report.total()
    );
    Ok(report)
}

/// Seeds the fixtures of one kind and returns how many were inserted.
pub fn seed_kind<R: EntityRepository>(
    repo: &R,
    kind: EntityKind,
    now_ms: i64,
) -> Result<usize, SeedError> {
    let documents = fixture_documents(kind, now_ms).map_err(|source| SeedError {
        kind,
        position: 0,
        source,
    })?;

    for (position, document) in documents.iter().enumerate() {
        if let Err(source) = repo.insert(kind, document.clone()) {
            error!(
                "event=seed_kind module=seed status=error kind={} position={} error={}",
                kind, position, source
            );
            return Err(SeedError {
                kind,
                position,
                source,
            });
        }
    }

    info!(
        "event=seed_kind module=seed status=ok kind={} count={}",
        kind,
        documents.len()
    );
    Ok(documents.len())
}

/// Returns the fixture list of `kind` as store documents.
pub fn fixture_documents(kind: EntityKind, now_ms: i64) -> Result<Vec<Document>, StoreError> {
    match kind {
        EntityKind::Activities => encode_all(&fixtures::activities(now_ms)),
        EntityKind::CalendarEvents => encode_all(&fixtures::calendar_events(now_ms)),
        EntityKind::Tasks => encode_all(&fixtures::tasks(now_ms)),
        EntityKind::Contacts => encode_all(&fixtures::contacts(now_ms)),
        EntityKind::ContentDrafts => encode_all(&fixtures::content_drafts(now_ms)),
        EntityKind::EcosystemProducts => encode_all(&fixtures::ecosystem_products(now_ms)),
    }
}

fn encode_all<E: Entity>(records: &[E]) -> Result<Vec<Document>, StoreError> {
    records
        .iter()
        .map(|record| {
            to_document(record).map_err(|err| {
                StoreError::InvalidData(format!("cannot encode {} fixture: {err}", E::KIND))
            })
        })
        .collect()
}
