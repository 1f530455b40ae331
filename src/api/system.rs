//! Liveness and readiness probes.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LivenessDto {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct DependencyChecks {
    pub database: bool,
}

#[derive(Debug, Serialize)]
pub struct ReadinessDto {
    pub ready: bool,
    pub checks: DependencyChecks,
}

/// GET /system/health/live
pub async fn health_live(State(state): State<Arc<AppState>>) -> Json<ApiResponse<LivenessDto>> {
    Json(ApiResponse::success(LivenessDto {
        status: "alive",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    }))
}

/// GET /system/health/ready
pub async fn health_ready(State(state): State<Arc<AppState>>) -> Response {
    let database = state
        .store()
        .ping()
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Database ping failed"))
        .is_ok();

    let checks = DependencyChecks { database };
    let ready = checks.database;
    let code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(ApiResponse::success(ReadinessDto { ready, checks }))).into_response()
}
