//! Command-line and environment configuration.
//!
//! Every flag has an `OPSDECK_*` environment fallback.

use clap::Parser;
use opsdeck_server::ServerSettings;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// OpsDeck - operations dashboard API server
#[derive(Parser, Debug, Clone)]
#[command(name = "opsdeck", version)]
#[command(about = "Serves the OpsDeck dashboard API over a SQLite entity store")]
pub struct Args {
    /// SQLite database file; in-memory when omitted
    #[arg(long, env = "OPSDECK_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "OPSDECK_BIND", default_value = "127.0.0.1:4000")]
    pub bind: SocketAddr,

    /// Log level (trace, debug, info, warn, error); build-mode default when omitted
    #[arg(long, env = "OPSDECK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files
    #[arg(long, env = "OPSDECK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Load demo fixtures into an empty store at startup
    #[arg(long, env = "OPSDECK_SEED", default_value = "false")]
    pub seed: bool,

    /// Delete every record before seeding
    #[arg(long, env = "OPSDECK_RESET", default_value = "false")]
    pub reset: bool,

    /// Directory scanned for recently edited notes in the activity feed
    #[arg(long, env = "OPSDECK_ACTIVITY_DIR")]
    pub activity_dir: Option<PathBuf>,

    /// Git checkout reported in the activity feed and `/api/repos` (repeatable)
    #[arg(long = "git-repo", env = "OPSDECK_GIT_REPOS", value_delimiter = ',')]
    pub git_repos: Vec<PathBuf>,

    /// JSONL file the chat transcript is appended to
    #[arg(long, env = "OPSDECK_CHAT_LOG")]
    pub chat_log: Option<PathBuf>,

    /// Timeout for each file or subprocess check, in milliseconds
    #[arg(long, env = "OPSDECK_SOURCE_TIMEOUT_MS", default_value = "1500")]
    pub source_timeout_ms: u64,

    /// Deployment label reported by `/api/system-state`
    #[arg(long, env = "OPSDECK_ENVIRONMENT", default_value = "development")]
    pub environment: String,

    /// Allowed CORS origin (repeatable); any origin when omitted
    #[arg(long = "allowed-origin", env = "OPSDECK_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,
}

impl Args {
    /// Absolute log directory, defaulting to `<tmp>/opsdeck/logs`.
    pub fn resolved_log_dir(&self) -> std::io::Result<PathBuf> {
        match &self.log_dir {
            Some(dir) if dir.is_absolute() => Ok(dir.clone()),
            Some(dir) => Ok(std::env::current_dir()?.join(dir)),
            None => Ok(std::env::temp_dir().join("opsdeck").join("logs")),
        }
    }

    pub fn server_settings(&self) -> ServerSettings {
        ServerSettings {
            environment: self.environment.clone(),
            allowed_origins: self.allowed_origins.clone(),
            source_timeout: Duration::from_millis(self.source_timeout_ms.max(1)),
            activity_dir: self.activity_dir.clone(),
            git_repos: self.git_repos.clone(),
            chat_log: self.chat_log.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn defaults_are_local_and_in_memory() {
        let args = Args::try_parse_from(["opsdeck"]).unwrap();
        assert_eq!(args.bind.to_string(), "127.0.0.1:4000");
        assert!(args.db_path.is_none());
        assert!(!args.seed);

        let settings = args.server_settings();
        assert_eq!(settings.source_timeout, Duration::from_millis(1500));
        assert_eq!(settings.environment, "development");
        assert!(settings.allowed_origins.is_empty());
    }

    #[test]
    fn repeatable_flags_collect_all_values() {
        let args = Args::try_parse_from([
            "opsdeck",
            "--git-repo",
            "/srv/a",
            "--git-repo",
            "/srv/b",
            "--allowed-origin",
            "http://localhost:3000",
            "--seed",
        ])
        .unwrap();
        assert_eq!(args.git_repos.len(), 2);
        assert_eq!(args.allowed_origins, vec!["http://localhost:3000"]);
        assert!(args.seed);
    }

    #[test]
    fn relative_log_dir_is_made_absolute() {
        let args = Args::try_parse_from(["opsdeck", "--log-dir", "logs"]).unwrap();
        assert!(args.resolved_log_dir().unwrap().is_absolute());
    }
}
