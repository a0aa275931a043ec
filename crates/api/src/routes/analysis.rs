//! Route definitions for the analysis form.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::analysis;
use crate::state::AppState;

/// Routes mounted at `/analysis`.
///
/// ```text
/// POST   /              -> submit_json
/// GET    /form          -> get_form
/// POST   /form          -> submit_form
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(analysis::submit_json))
        .route(
            "/form",
            get(analysis::get_form).post(analysis::submit_form),
        )
}
