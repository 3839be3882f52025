//! Thin `git` subprocess helpers.
//!
//! # Invariants
//! - Child processes are killed when the calling future is dropped, so an
//!   outer timeout never leaks a running `git`.
//! - Output is parsed from `\x1f`-separated `--format` fields only.

use crate::activity::SourceError;
use serde::Serialize;
use std::path::Path;
use tokio::process::Command;

const FIELD_SEPARATOR: char = '\u{1f}';
const LOG_FORMAT: &str = "--format=%h%x1f%ct%x1f%an%x1f%s";

/// One commit line from `git log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub sha: String,
    /// Committer time, Unix epoch milliseconds.
    pub timestamp: i64,
    pub author: String,
    pub message: String,
}

/// Runs `git -C <repo> <args>` and returns stdout.
pub async fn run_git(repo: &Path, args: &[&str]) -> Result<String, SourceError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        return Err(SourceError::Command {
            command: format!("git {}", args.join(" ")),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    String::from_utf8(output.stdout).map_err(|err| SourceError::Parse(err.to_string()))
}

pub async fn current_branch(repo: &Path) -> Result<String, SourceError> {
    let stdout = run_git(repo, &["rev-parse", "--abbrev-ref", "HEAD"]).await?;
    Ok(stdout.trim().to_string())
}

/// Returns up to `limit` commits of the checked-out branch, newest first.
pub async fn recent_commits(repo: &Path, limit: usize) -> Result<Vec<CommitSummary>, SourceError> {
    let count = format!("-n{}", limit.max(1));
    let stdout = run_git(repo, &["log", count.as_str(), LOG_FORMAT]).await?;
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_log_line)
        .collect()
}

/// Directory name used as the repository label.
pub fn repo_name(repo: &Path) -> String {
    repo.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| repo.display().to_string())
}

fn parse_log_line(line: &str) -> Result<CommitSummary, SourceError> {
    let mut fields = line.splitn(4, FIELD_SEPARATOR);
    let (Some(sha), Some(seconds), Some(author), Some(message)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(SourceError::Parse(format!("malformed log line `{line}`")));
    };
    let seconds = seconds
        .parse::<i64>()
        .map_err(|_| SourceError::Parse(format!("bad commit time `{seconds}`")))?;

    Ok(CommitSummary {
        sha: sha.to_string(),
        timestamp: seconds * 1000,
        author: author.to_string(),
        message: message.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_log_line, repo_name};
    use std::path::Path;

    #[test]
    fn parses_separated_log_fields() {
        let commit =
            parse_log_line("a1b2c3d\u{1f}1700000000\u{1f}Alice\u{1f}Fix: pool leak").unwrap();
        assert_eq!(commit.sha, "a1b2c3d");
        assert_eq!(commit.timestamp, 1_700_000_000_000);
        assert_eq!(commit.author, "Alice");
        assert_eq!(commit.message, "Fix: pool leak");
    }

    #[test]
    fn rejects_truncated_lines() {
        assert!(parse_log_line("a1b2c3d\u{1f}1700000000").is_err());
        assert!(parse_log_line("a1b2c3d\u{1f}soon\u{1f}Alice\u{1f}msg").is_err());
    }

    #[test]
    fn repo_name_is_last_path_component() {
        assert_eq!(repo_name(Path::new("/srv/repos/flip-analyzer")), "flip-analyzer");
    }
}
