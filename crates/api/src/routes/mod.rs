pub mod analysis;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /analysis                 typed JSON submission (POST)
/// /analysis/form            blank form (GET), browser form post (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/analysis", analysis::router())
}
