use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the default analyzer binary exists.
    pub analyzer_found: bool,
}

/// GET /health -- returns service health and analyzer availability.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let defaults = state.analysis.defaults();
    let binary = defaults.program_path(&defaults.binary);
    let analyzer_found = tokio::fs::metadata(&binary)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);

    let status = if analyzer_found { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        analyzer_found,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
