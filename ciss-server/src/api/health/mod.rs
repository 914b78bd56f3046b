//! Health Check API

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::{ApiResponse, ok};

/// Health router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/health", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", get(health))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: i64,
    pub database: bool,
}

/// Liveness and database probe
async fn health(State(state): State<ServerState>) -> Json<ApiResponse<HealthStatus>> {
    let database = state.db.ping().await;
    let status = if database { "ok" } else { "degraded" };

    ok(HealthStatus {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
        database,
    })
}
