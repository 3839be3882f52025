//! Derived dashboard snapshots: activity feed, revenue, priorities, system
//! state, health and repository metadata.
//!
//! # Invariants
//! - File and subprocess checks run under the configured source timeout and
//!   degrade to an error entry, never to a failed request.

use super::read_body;
use crate::activity::SourceError;
use crate::error::{ApiError, ApiResult, Envelope};
use crate::git::{current_branch, recent_commits, repo_name, CommitSummary};
use crate::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use log::warn;
use opsdeck_core::{
    core_version, Contact, ContactStatus, EcosystemProduct, EntityKind, StoreResult, Task,
    TaskPriority,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_ACTIVITY_LIMIT: usize = 20;
const MAX_ACTIVITY_LIMIT: usize = 100;

const ACTIVITIES: Envelope = Envelope::list("activities");
const REVENUE: Envelope = Envelope::single("revenue");
const PRIORITIES: Envelope = Envelope::list("priorities");
const SYSTEM: Envelope = Envelope::single("system");
const REPOSITORIES: Envelope = Envelope::list("repositories");

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/activity", get(activity))
        .route("/api/revenue", get(revenue))
        .route("/api/priorities", get(priorities))
        .route("/api/system-state", get(system_state))
        .route("/api/health", get(health))
        .route("/api/repos", get(repos))
}

#[derive(Debug, Deserialize)]
struct ActivityQuery {
    limit: Option<usize>,
}

async fn activity(
    State(state): State<AppState>,
    query: Result<Query<ActivityQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) =
        query.map_err(|rejection| ApiError::unprocessable(ACTIVITIES, rejection.body_text()))?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .clamp(1, MAX_ACTIVITY_LIMIT);

    let entries = state.feed.recent(limit).await;
    let payload =
        serde_json::to_value(entries).map_err(|err| ApiError::internal(ACTIVITIES, err.to_string()))?;
    Ok(read_body(ACTIVITIES, payload))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductRevenue {
    id: String,
    name: String,
    revenue: f64,
    status: String,
}

/// Sums non-negative amounts, saturating at `f64::MAX`.
fn total(amounts: impl Iterator<Item = f64>) -> f64 {
    amounts.fold(0.0, |sum, amount| capped(sum + amount))
}

fn capped(amount: f64) -> f64 {
    amount.min(f64::MAX)
}

/// Monthly figures from live products and the contact pipeline.
async fn revenue(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let (products, contacts) = state.with_service(REVENUE, |service| {
        Ok((
            service.list_records::<EcosystemProduct>()?,
            service.list_records::<Contact>()?,
        ))
    })?;

    let mut by_product = products
        .iter()
        .filter(|product| product.is_live() && product.revenue > 0.0)
        .map(|product| ProductRevenue {
            id: product.id.clone(),
            name: product.name.clone(),
            revenue: product.revenue,
            status: product.status.to_string(),
        })
        .collect::<Vec<_>>();
    by_product.sort_by(|left, right| right.revenue.total_cmp(&left.revenue));

    let mrr = total(by_product.iter().map(|product| product.revenue));
    let customers = contacts
        .iter()
        .filter(|contact| contact.status == ContactStatus::Active)
        .count();
    let open_deals = contacts
        .iter()
        .filter(|contact| contact.in_pipeline() && contact.status != ContactStatus::Active)
        .collect::<Vec<_>>();
    let users = total(products.iter().map(|product| product.users));
    let arpu = if customers == 0 {
        0.0
    } else {
        mrr / customers as f64
    };

    Ok(Json(json!({
        "mrr": mrr,
        "arr": capped(mrr * 12.0),
        "revenueByProduct": by_product,
        "pipeline": {
            "openDeals": open_deals.len(),
            "value": total(open_deals.iter().map(|contact| contact.value)),
        },
        "metrics": {
            "customers": customers,
            "users": users,
            "arpu": arpu,
        },
    })))
}

/// Open high-priority tasks, in board order.
async fn priorities(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let tasks = state.with_service(PRIORITIES, |service| service.list_records::<Task>())?;
    let priorities = tasks
        .into_iter()
        .filter(|task| task.is_open() && task.priority == TaskPriority::High)
        .map(|task| {
            json!({
                "id": task.id,
                "title": task.title,
                "priority": task.priority,
                "deadline": task.due_date,
                "category": task.project,
                "status": task.status,
            })
        })
        .collect::<Vec<_>>();
    Ok(read_body(PRIORITIES, priorities))
}

#[derive(Debug, Clone, Serialize)]
struct Check {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl Check {
    fn healthy(latency: Option<String>) -> Self {
        Self {
            status: "healthy",
            latency,
            detail: None,
        }
    }

    fn error(detail: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency: None,
            detail: Some(detail.into()),
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

fn database_check(state: &AppState) -> Check {
    let Ok(store) = state.store.lock() else {
        return Check::error("store lock poisoned");
    };
    match store.ping() {
        Ok(latency) => Check::healthy(Some(format!("{}ms", latency.as_millis()))),
        Err(err) => Check::error(err.to_string()),
    }
}

async fn directory_check(path: &Path, timeout: Duration) -> Check {
    match tokio::time::timeout(timeout, tokio::fs::metadata(path)).await {
        Ok(Ok(metadata)) if metadata.is_dir() => Check::healthy(None),
        Ok(Ok(_)) => Check::error(format!("{} is not a directory", path.display())),
        Ok(Err(err)) => Check::error(format!("{}: {err}", path.display())),
        Err(_) => Check::error(format!("{} timed out", path.display())),
    }
}

async fn health_checks(state: &AppState) -> Map<String, Value> {
    let settings = &state.settings;
    let mut checks = vec![("database", database_check(state))];
    if let Some(dir) = &settings.activity_dir {
        checks.push(("activityDir", directory_check(dir, settings.source_timeout).await));
    }
    if let Some(parent) = settings
        .chat_log
        .as_deref()
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        checks.push(("chatLog", directory_check(parent, settings.source_timeout).await));
    }
    for repo in &settings.git_repos {
        let check = directory_check(repo, settings.source_timeout).await;
        if !check.is_healthy() {
            warn!(
                "event=health_check module=http status=error repo={} detail={}",
                repo.display(),
                check.detail.as_deref().unwrap_or_default()
            );
        }
        checks.push(("gitRepos", check));
    }

    let mut merged = Map::new();
    for (name, check) in checks {
        // Repeated names keep the first failure.
        let keep_existing = merged
            .get(name)
            .and_then(|existing| existing.get("status"))
            .is_some_and(|status| status != "healthy");
        if !keep_existing {
            merged.insert(name.to_string(), json!(check));
        }
    }
    merged
}

fn all_healthy(checks: &Map<String, Value>) -> bool {
    checks
        .values()
        .all(|check| check.get("status").and_then(Value::as_str) == Some("healthy"))
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let checks = health_checks(&state).await;
    let healthy = all_healthy(&checks);
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(json!({
            "status": if healthy { "healthy" } else { "degraded" },
            "timestamp": timestamp(),
            "checks": checks,
        })),
    )
}

async fn system_state(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let counts = state.with_service(SYSTEM, |service| {
        EntityKind::ALL
            .into_iter()
            .map(|kind| Ok((kind.as_str().to_string(), Value::from(service.count(kind)?))))
            .collect::<StoreResult<Map<String, Value>>>()
    })?;
    let services = health_checks(&state).await;
    let operational = all_healthy(&services);

    Ok(Json(json!({
        "status": if operational { "operational" } else { "degraded" },
        "timestamp": timestamp(),
        "version": core_version(),
        "environment": state.settings.environment,
        "uptimeSeconds": state.started_at.elapsed().as_secs(),
        "recordCounts": counts,
        "activitySources": state.feed.source_names(),
        "services": services,
    })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryInfo {
    name: String,
    path: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<String>,
    last_commit: Option<CommitSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn describe_repo(repo: PathBuf, timeout: Duration) -> RepositoryInfo {
    let inspect = async {
        let branch = current_branch(&repo).await?;
        let last_commit = recent_commits(&repo, 1).await?.into_iter().next();
        Ok::<_, SourceError>((branch, last_commit))
    };
    let result = match tokio::time::timeout(timeout, inspect).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout(timeout)),
    };

    let name = repo_name(&repo);
    let path = repo.display().to_string();
    match result {
        Ok((branch, last_commit)) => RepositoryInfo {
            name,
            path,
            status: "ok",
            branch: Some(branch),
            last_commit,
            error: None,
        },
        Err(err) => {
            warn!(
                "event=repo_describe module=http status=error repo={} error={}",
                path, err
            );
            RepositoryInfo {
                name,
                path,
                status: "unavailable",
                branch: None,
                last_commit: None,
                error: Some(err.to_string()),
            }
        }
    }
}

async fn repos(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let mut repositories = Vec::new();
    for repo in &state.settings.git_repos {
        repositories.push(describe_repo(repo.clone(), state.settings.source_timeout).await);
    }
    let payload = serde_json::to_value(repositories)
        .map_err(|err| ApiError::internal(REPOSITORIES, err.to_string()))?;
    Ok(read_body(REPOSITORIES, payload))
}
