use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::providers::ProviderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Payload too large (limit {limit} bytes)")]
    PayloadTooLarge { limit: usize },

    #[error("Analysis error: {0}")]
    Analysis(ProviderError),

    #[error("Parse error: {0}")]
    Parse(ProviderError),

    #[error("Improvement error: {0}")]
    Improve(ProviderError),

    #[error("Document generation error: {0}")]
    DocumentGeneration(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "INVALID_FILE_TYPE",
                msg.clone(),
            ),
            AppError::PayloadTooLarge { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                format!("File exceeds the {limit}-byte upload limit"),
            ),
            AppError::Analysis(e) => {
                tracing::error!("Analysis provider error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ANALYSIS_ERROR",
                    "Failed to analyze resume".to_string(),
                )
            }
            AppError::Parse(e) => {
                tracing::error!("Resume parser error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PARSE_ERROR",
                    "Failed to parse resume".to_string(),
                )
            }
            AppError::Improve(e) => {
                tracing::error!("Improvement generator error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "IMPROVE_ERROR",
                    "Failed to generate improved resume".to_string(),
                )
            }
            AppError::DocumentGeneration(e) => {
                tracing::error!("Document generation error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DOCUMENT_GENERATION_ERROR",
                    "Failed to generate PDF report".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
