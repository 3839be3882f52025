//! Static agent roster.

use super::read_body;
use crate::error::{ApiError, ApiResult, Envelope};
use crate::state::AppState;
use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;

const AGENTS: Envelope = Envelope::list("agents");
const AGENT: Envelope = Envelope::single("agent");

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct AgentConfig {
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct Agent {
    id: &'static str,
    name: &'static str,
    /// `active|idle|offline`
    status: &'static str,
    current_task: Option<&'static str>,
    last_output: &'static str,
    model: &'static str,
    cost_today: f64,
    tokens_used: u64,
    specialty: &'static [&'static str],
    config: AgentConfig,
}

static ROSTER: [Agent; 5] = [
    Agent {
        id: "1",
        name: "Alice",
        status: "active",
        current_task: Some("Code review for PR #234"),
        last_output: "Found 3 potential issues in authentication.ts",
        model: "claude-3-opus",
        cost_today: 12.45,
        tokens_used: 125_000,
        specialty: &["Code Review", "Architecture"],
        config: AgentConfig {
            temperature: 0.7,
            max_tokens: 4000,
        },
    },
    Agent {
        id: "2",
        name: "Bob",
        status: "idle",
        current_task: None,
        last_output: "Task completed: Documentation updated",
        model: "gpt-4",
        cost_today: 8.20,
        tokens_used: 89_000,
        specialty: &["Writing", "Analysis"],
        config: AgentConfig {
            temperature: 0.5,
            max_tokens: 2000,
        },
    },
    Agent {
        id: "3",
        name: "Charlie",
        status: "active",
        current_task: Some("Customer support ticket #4521"),
        last_output: "Drafting response with technical details...",
        model: "claude-3-sonnet",
        cost_today: 5.80,
        tokens_used: 67_000,
        specialty: &["Support", "Communication"],
        config: AgentConfig {
            temperature: 0.6,
            max_tokens: 3000,
        },
    },
    Agent {
        id: "4",
        name: "Diana",
        status: "offline",
        current_task: None,
        last_output: "Agent shutdown: Maintenance mode",
        model: "gpt-4-turbo",
        cost_today: 0.0,
        tokens_used: 0,
        specialty: &["Research", "Data Analysis"],
        config: AgentConfig {
            temperature: 0.3,
            max_tokens: 4000,
        },
    },
    Agent {
        id: "5",
        name: "Eve",
        status: "active",
        current_task: Some("Content generation for newsletter"),
        last_output: "Generated 3 blog post ideas",
        model: "claude-3-haiku",
        cost_today: 2.30,
        tokens_used: 34_000,
        specialty: &["Content", "Creative"],
        config: AgentConfig {
            temperature: 0.9,
            max_tokens: 2000,
        },
    },
];

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/agents", get(list_agents))
        .route("/api/agents/{id}", get(get_agent))
}

async fn list_agents() -> ApiResult<Json<Value>> {
    let payload = serde_json::to_value(&ROSTER)
        .map_err(|err| ApiError::internal(AGENTS, err.to_string()))?;
    Ok(read_body(AGENTS, payload))
}

async fn get_agent(Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let agent = ROSTER
        .iter()
        .find(|agent| agent.id == id)
        .ok_or_else(|| ApiError::not_found(AGENT, "Agent not found"))?;
    let payload =
        serde_json::to_value(agent).map_err(|err| ApiError::internal(AGENT, err.to_string()))?;
    Ok(read_body(AGENT, payload))
}
