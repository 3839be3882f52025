//! Static monitoring feeds: operator observations and scheduled job health.

use super::read_body;
use crate::error::{ApiError, ApiResult, Envelope};
use crate::state::AppState;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};

const OBSERVATIONS: Envelope = Envelope::list("observations");
const JOBS: Envelope = Envelope::list("jobs");

struct ObservationSeed {
    id: &'static str,
    message: &'static str,
    /// `info|warning|success`
    kind: &'static str,
    source: &'static str,
    age_hours: i64,
}

const OBSERVATION_SEEDS: [ObservationSeed; 5] = [
    ObservationSeed {
        id: "1",
        message: "API response times increased by 15% in the last hour",
        kind: "warning",
        source: "monitoring",
        age_hours: 0,
    },
    ObservationSeed {
        id: "2",
        message: "3 new signups from enterprise tier",
        kind: "info",
        source: "analytics",
        age_hours: 1,
    },
    ObservationSeed {
        id: "3",
        message: "Deployment completed successfully",
        kind: "success",
        source: "deploy",
        age_hours: 2,
    },
    ObservationSeed {
        id: "4",
        message: "Database backup completed",
        kind: "success",
        source: "backup",
        age_hours: 3,
    },
    ObservationSeed {
        id: "5",
        message: "High memory usage detected on worker-01",
        kind: "warning",
        source: "monitoring",
        age_hours: 4,
    },
];

#[derive(Debug, Serialize)]
struct Observation {
    id: &'static str,
    message: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    source: &'static str,
    timestamp: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct CronJob {
    id: &'static str,
    name: &'static str,
    schedule: &'static str,
    last_run: &'static str,
    next_run: &'static str,
    /// `idle|running|failed`
    status: &'static str,
}

static CRON_JOBS: [CronJob; 5] = [
    CronJob {
        id: "1",
        name: "Daily Backup",
        schedule: "0 2 * * *",
        last_run: "2 hours ago",
        next_run: "22 hours",
        status: "idle",
    },
    CronJob {
        id: "2",
        name: "Health Check",
        schedule: "*/5 * * * *",
        last_run: "3 minutes ago",
        next_run: "2 minutes",
        status: "running",
    },
    CronJob {
        id: "3",
        name: "Report Generation",
        schedule: "0 9 * * 1",
        last_run: "5 days ago",
        next_run: "2 days",
        status: "idle",
    },
    CronJob {
        id: "4",
        name: "Cache Cleanup",
        schedule: "0 */6 * * *",
        last_run: "4 hours ago",
        next_run: "2 hours",
        status: "idle",
    },
    CronJob {
        id: "5",
        name: "Log Rotation",
        schedule: "0 0 * * *",
        last_run: "8 hours ago",
        next_run: "16 hours",
        status: "idle",
    },
];

#[derive(Debug, PartialEq, Eq, Serialize)]
struct JobSummary {
    total: usize,
    healthy: usize,
    failed: usize,
    running: usize,
}

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/observations", get(list_observations))
        .route("/api/cron-health", get(cron_health))
}

/// Observations stamped relative to `now`, newest first.
fn observations_at(now: DateTime<Utc>) -> Vec<Observation> {
    OBSERVATION_SEEDS
        .iter()
        .map(|seed| Observation {
            id: seed.id,
            message: seed.message,
            kind: seed.kind,
            source: seed.source,
            timestamp: (now - Duration::hours(seed.age_hours))
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        })
        .collect()
}

fn summarize(jobs: &[CronJob]) -> JobSummary {
    let failed = jobs.iter().filter(|job| job.status == "failed").count();
    JobSummary {
        total: jobs.len(),
        healthy: jobs.len() - failed,
        failed,
        running: jobs.iter().filter(|job| job.status == "running").count(),
    }
}

async fn list_observations() -> ApiResult<Json<Value>> {
    let payload = serde_json::to_value(observations_at(Utc::now()))
        .map_err(|err| ApiError::internal(OBSERVATIONS, err.to_string()))?;
    Ok(read_body(OBSERVATIONS, payload))
}

async fn cron_health() -> ApiResult<Json<Value>> {
    let jobs =
        serde_json::to_value(&CRON_JOBS).map_err(|err| ApiError::internal(JOBS, err.to_string()))?;
    Ok(Json(json!({
        "jobs": jobs,
        "summary": summarize(&CRON_JOBS),
    })))
}
