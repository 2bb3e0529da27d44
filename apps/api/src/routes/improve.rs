use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveRequest {
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveResponse {
    pub improved_resume: String,
}

/// POST /api/v1/improve
pub async fn handle_improve(
    State(state): State<AppState>,
    payload: Result<Json<ImproveRequest>, JsonRejection>,
) -> Result<Json<ImproveResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resumeText must not be empty".to_string(),
        ));
    }
    let improved_resume = state
        .providers
        .improver
        .improve(&req.resume_text)
        .await
        .map_err(AppError::Improve)?;
    Ok(Json(ImproveResponse { improved_resume }))
}
