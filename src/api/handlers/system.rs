//! System endpoints: health check and the static job catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Catalog job info.
#[derive(Debug, Serialize, ToSchema)]
struct JobInfo {
    id: &'static str,
    name: &'static str,
    description: &'static str,
}

/// `GET /config/jobs` — List the job catalog.
#[utoipa::path(
    get,
    path = "/config/jobs",
    tag = "System",
    summary = "List catalog jobs",
    description = "Returns the static catalog of jobs that event requirements can reference.",
    responses(
        (status = 200, description = "Job catalog", body = Vec<JobInfo>),
    )
)]
pub async fn jobs_handler() -> impl IntoResponse {
    let jobs = vec![
        JobInfo {
            id: "usher",
            name: "Usher",
            description: "Guides attendees to their seats and answers questions",
        },
        JobInfo {
            id: "gate_steward",
            name: "Gate Steward",
            description: "Checks tickets and controls entry flow at the gates",
        },
        JobInfo {
            id: "security_marshal",
            name: "Security Marshal",
            description: "Monitors crowd safety inside the venue",
        },
        JobInfo {
            id: "hospitality",
            name: "Hospitality Staff",
            description: "Serves VIP lounges and hospitality suites",
        },
        JobInfo {
            id: "logistics",
            name: "Logistics Crew",
            description: "Moves equipment and supports venue setup and teardown",
        },
    ];
    (StatusCode::OK, Json(jobs))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/jobs", get(jobs_handler))
}
