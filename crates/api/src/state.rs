use std::sync::Arc;

use mga_core::handler::RequestHandler;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration. The router takes CORS origins and the request
    /// deadline from here.
    pub config: Arc<ServerConfig>,
    /// Runs submissions against the analyzer.
    pub analysis: Arc<RequestHandler>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let analysis = RequestHandler::new(Arc::new(config.analyzer.clone()));
        Self {
            config: Arc::new(config),
            analysis: Arc::new(analysis),
        }
    }
}
