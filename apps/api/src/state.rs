use std::sync::Arc;

use crate::config::Config;
use crate::generator::TextGenerator;
use crate::stats::ServerStats;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub stats: Arc<ServerStats>,
    /// Backend for the AI endpoints. `GeminiClient` in production.
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            config,
            stats: Arc::new(ServerStats::default()),
            generator,
        }
    }
}
