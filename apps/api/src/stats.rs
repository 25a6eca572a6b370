//! Process-wide counters reported by `/api/v1/stats` and `/health`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug)]
pub struct ServerStats {
    started: Instant,
    total_requests: AtomicU64,
    total_parsed_resumes: AtomicU64,
    errors: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub uptime: u64,
    pub total_requests: u64,
    pub total_parsed_resumes: u64,
    pub errors: u64,
}

impl Default for ServerStats {
    fn default() -> Self {
        Self {
            started: Instant::now(),
            total_requests: AtomicU64::new(0),
            total_parsed_resumes: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
}

impl ServerStats {
    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse(&self) {
        self.total_parsed_resumes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            uptime: self.uptime_secs(),
            total_requests: self.total_requests.load(Ordering::Relaxed),
            total_parsed_resumes: self.total_parsed_resumes.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Middleware: counts every request, and every 4xx/5xx response as an error.
pub async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.stats.record_request();
    let response = next.run(request).await;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        state.stats.record_error();
    }
    response
}
