use super::{sort_newest_first, ActivitySource, SourceError};
use crate::git::{recent_commits, repo_name};
use async_trait::async_trait;
use log::warn;
use opsdeck_core::{Activity, ActivityKind};
use serde_json::json;
use std::path::PathBuf;

/// Commits from a set of local git checkouts.
///
/// An unreadable repository is skipped; the source only fails when every
/// repository fails.
pub struct GitActivitySource {
    repos: Vec<PathBuf>,
}

impl GitActivitySource {
    pub fn new(repos: Vec<PathBuf>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl ActivitySource for GitActivitySource {
    fn name(&self) -> &'static str {
        "git"
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<Activity>, SourceError> {
        let mut entries = Vec::new();
        let mut last_error = None;

        for repo in &self.repos {
            let name = repo_name(repo);
            match recent_commits(repo, limit).await {
                Ok(commits) => {
                    entries.extend(commits.into_iter().map(|commit| Activity {
                        id: format!("git-{name}-{}", commit.sha),
                        kind: ActivityKind::User,
                        message: format!("{name}: {}", commit.message),
                        timestamp: commit.timestamp,
                        metadata: Some(json!({
                            "category": "git",
                            "repo": name,
                            "sha": commit.sha,
                            "author": commit.author,
                        })),
                    }));
                }
                Err(err) => {
                    warn!(
                        "event=git_log module=activity status=error repo={} error={}",
                        repo.display(),
                        err
                    );
                    last_error = Some(err);
                }
            }
        }

        if entries.is_empty() {
            if let Some(err) = last_error {
                return Err(err);
            }
        }
        sort_newest_first(&mut entries);
        entries.truncate(limit);
        Ok(entries)
    }
}
