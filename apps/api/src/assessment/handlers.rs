//! JSON API handlers for the assessment flow.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::assessment::analyzer::{run_assessment, AssessmentOutcome};
use crate::errors::AppError;
use crate::models::assessment::WorkplaceAssessmentRequest;
use crate::state::AppState;

/// POST /api/v1/assessments
///
/// Returns `{"status": "structured", "result": ...}` or, when the reply was
/// not readable JSON, `{"status": "raw", "error": ..., "raw_text": ...}`.
pub async fn handle_create_assessment(
    State(state): State<AppState>,
    payload: Result<Json<WorkplaceAssessmentRequest>, JsonRejection>,
) -> Result<Json<AssessmentOutcome>, AppError> {
    let llm = state.completion()?;
    let Json(request) = payload?;
    request.validate().map_err(AppError::Validation)?;

    let outcome = run_assessment(llm, &request, state.config.chat_variant).await?;
    Ok(Json(outcome))
}
