//! Operator chat history.
//!
//! # Responsibility
//! - Keep the in-process chat transcript, starting from a fixed greeting
//!   thread.
//! - Optionally mirror every sent message to a JSONL append log and replay
//!   it at startup.
//!
//! # Invariants
//! - History order is append order.
//! - Log write failures are logged and never fail a send.
//! - Unparseable log lines are skipped on replay.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const MINUTE_MS: i64 = 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: String,
    pub is_agent: bool,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

/// Chat transcript with optional JSONL persistence.
pub struct ChatLog {
    messages: Mutex<Vec<ChatMessage>>,
    path: Option<PathBuf>,
}

impl ChatLog {
    /// Builds the transcript, replaying `path` when it exists.
    pub async fn open(path: Option<PathBuf>, now_ms: i64) -> Self {
        let mut messages = greeting_thread(now_ms);
        if let Some(path) = &path {
            let replayed = replay(path).await;
            info!(
                "event=chat_replay module=chat status=ok path={} count={}",
                path.display(),
                replayed.len()
            );
            messages.extend(replayed);
        }
        Self {
            messages: Mutex::new(messages),
            path,
        }
    }

    pub async fn history(&self) -> Vec<ChatMessage> {
        self.messages.lock().await.clone()
    }

    /// Records an operator message and the system acknowledgement.
    ///
    /// Returns the acknowledgement.
    pub async fn send(&self, content: &str, now_ms: i64) -> ChatMessage {
        let mut messages = self.messages.lock().await;
        let sequence = messages.len();
        let outgoing = ChatMessage {
            id: format!("{now_ms}-{sequence}"),
            content: content.to_string(),
            sender: "You".to_string(),
            is_agent: false,
            timestamp: now_ms,
        };
        let reply = ChatMessage {
            id: format!("{now_ms}-{}", sequence + 1),
            content: format!("Received: \"{content}\". Processing your request..."),
            sender: "System".to_string(),
            is_agent: true,
            timestamp: now_ms,
        };

        if let Some(path) = &self.path {
            if let Err(err) = append(path, &[&outgoing, &reply]).await {
                warn!(
                    "event=chat_append module=chat status=error path={} error={}",
                    path.display(),
                    err
                );
            }
        }
        messages.push(outgoing);
        messages.push(reply.clone());
        reply
    }
}

async fn replay(path: &Path) -> Vec<ChatMessage> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            warn!(
                "event=chat_replay module=chat status=error path={} error={}",
                path.display(),
                err
            );
            return Vec::new();
        }
    };

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(line_no, line)| match serde_json::from_str(line) {
            Ok(message) => Some(message),
            Err(err) => {
                warn!(
                    "event=chat_replay module=chat status=skipped line={} error={}",
                    line_no + 1,
                    err
                );
                None
            }
        })
        .collect()
}

async fn append(path: &Path, messages: &[&ChatMessage]) -> std::io::Result<()> {
    let mut buffer = String::new();
    for message in messages {
        buffer.push_str(&serde_json::to_string(message)?);
        buffer.push('\n');
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(buffer.as_bytes()).await?;
    file.flush().await
}

fn greeting_thread(now_ms: i64) -> Vec<ChatMessage> {
    let entry = |id: &str, content: &str, sender: &str, is_agent, age_minutes: i64| ChatMessage {
        id: id.to_string(),
        content: content.to_string(),
        sender: sender.to_string(),
        is_agent,
        timestamp: now_ms - age_minutes * MINUTE_MS,
    };
    vec![
        entry(
            "1",
            "Hey team, the new feature is ready for review!",
            "Alice",
            true,
            32,
        ),
        entry("2", "Great! I'll take a look at it now.", "You", false, 30),
        entry(
            "3",
            "Found a small issue with the auth flow. Should be a quick fix.",
            "Alice",
            true,
            17,
        ),
        entry(
            "4",
            "Thanks for catching that. Let me know when it's updated.",
            "You",
            false,
            16,
        ),
        entry(
            "5",
            "Fixed! The token validation was missing a check. Deployed to staging.",
            "Alice",
            true,
            0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::ChatLog;

    #[tokio::test]
    async fn send_appends_message_and_acknowledgement() {
        let chat = ChatLog::open(None, 1_000_000).await;
        let before = chat.history().await.len();

        let reply = chat.send("deploy status?", 2_000_000).await;

        assert!(reply.is_agent);
        assert_eq!(
            reply.content,
            "Received: \"deploy status?\". Processing your request..."
        );
        let history = chat.history().await;
        assert_eq!(history.len(), before + 2);
        assert_eq!(history[before].content, "deploy status?");
        assert_eq!(history[before + 1], reply);
    }

    #[tokio::test]
    async fn persisted_messages_are_replayed_and_bad_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.jsonl");

        let first = ChatLog::open(Some(path.clone()), 1_000).await;
        let baseline = first.history().await.len();
        first.send("hello", 2_000).await;
        drop(first);

        let mut raw = std::fs::read_to_string(&path).unwrap();
        raw.push_str("{not json}\n");
        std::fs::write(&path, raw).unwrap();

        let reopened = ChatLog::open(Some(path), 3_000).await;
        let history = reopened.history().await;
        assert_eq!(history.len(), baseline + 2);
        assert_eq!(history[baseline].content, "hello");
    }

    #[tokio::test]
    async fn unwritable_log_does_not_fail_send() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("chat.jsonl");
        let chat = ChatLog::open(Some(path), 1_000).await;

        let reply = chat.send("still works", 2_000).await;
        assert!(reply.content.contains("still works"));
    }
}
