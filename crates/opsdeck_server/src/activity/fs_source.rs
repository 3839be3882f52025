use super::{sort_newest_first, ActivitySource, SourceError};
use async_trait::async_trait;
use opsdeck_core::{Activity, ActivityKind};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

const MAX_DEPTH: usize = 3;
const NOTE_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Recently modified notes under one directory tree.
///
/// Hidden entries are skipped; the walk stops `MAX_DEPTH` levels down.
pub struct FsActivitySource {
    root: PathBuf,
}

impl FsActivitySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn collect_notes(&self) -> Result<Vec<(PathBuf, i64)>, SourceError> {
        let mut notes = Vec::new();
        let mut pending = vec![(self.root.clone(), 0_usize)];

        while let Some((dir, depth)) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if is_hidden(&path) {
                    continue;
                }
                let metadata = entry.metadata().await?;
                if metadata.is_dir() {
                    if depth + 1 < MAX_DEPTH {
                        pending.push((path, depth + 1));
                    }
                    continue;
                }
                if !is_note(&path) {
                    continue;
                }
                let modified_ms = metadata
                    .modified()?
                    .duration_since(UNIX_EPOCH)
                    .map_err(|err| SourceError::Parse(err.to_string()))?
                    .as_millis();
                notes.push((path, i64::try_from(modified_ms).unwrap_or(i64::MAX)));
            }
        }
        Ok(notes)
    }
}

#[async_trait]
impl ActivitySource for FsActivitySource {
    fn name(&self) -> &'static str {
        "fs"
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<Activity>, SourceError> {
        let notes = self.collect_notes().await?;
        let mut entries = notes
            .into_iter()
            .map(|(path, modified_ms)| {
                let relative = path
                    .strip_prefix(&self.root)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/");
                Activity {
                    id: format!("file-{relative}"),
                    kind: ActivityKind::System,
                    message: format!("Updated {relative}"),
                    timestamp: modified_ms,
                    metadata: Some(json!({ "category": "file", "path": relative })),
                }
            })
            .collect::<Vec<_>>();
        sort_newest_first(&mut entries);
        entries.truncate(limit);
        Ok(entries)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn is_note(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| NOTE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
