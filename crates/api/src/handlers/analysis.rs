//! Handlers for the analysis form.
//!
//! Every decoded submission yields `200` with an [`AnalysisReport`], whether
//! the analyzer succeeded, failed, or was never started. Only undecodable
//! bodies and unknown input tabs are rejected with `400`.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::State;
use axum::{Form, Json};
use mga_core::handler::AnalysisReport;
use mga_core::submission::{FormState, RawSubmission, SubmissionForm};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /analysis/form
///
/// The blank form with display defaults filled in.
pub async fn get_form(State(state): State<AppState>) -> Json<DataResponse<FormState>> {
    Json(DataResponse {
        data: FormState::initial(state.analysis.defaults()),
    })
}

/// POST /analysis/form
///
/// Accept the browser form (`application/x-www-form-urlencoded`).
pub async fn submit_form(
    State(state): State<AppState>,
    form: Result<Form<RawSubmission>, FormRejection>,
) -> AppResult<Json<DataResponse<AnalysisReport>>> {
    let Form(raw) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let report = state.analysis.handle_form(&raw).await?;
    Ok(Json(DataResponse { data: report }))
}

/// POST /analysis
///
/// Accept a typed JSON [`SubmissionForm`].
pub async fn submit_json(
    State(state): State<AppState>,
    body: Result<Json<SubmissionForm>, JsonRejection>,
) -> AppResult<Json<DataResponse<AnalysisReport>>> {
    let Json(form) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let report = state.analysis.handle(&form).await;
    Ok(Json(DataResponse { data: report }))
}
