use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::models::response::ApiResponse;
use crate::state::AppState;
use crate::stats::StatsSnapshot;

/// GET /health
/// Returns a simple status object with service version and uptime.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-api",
        "uptime": state.stats.uptime_secs()
    }))
}

/// GET /api/v1/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<ApiResponse<StatsSnapshot>> {
    Json(ApiResponse::ok(state.stats.snapshot()))
}
