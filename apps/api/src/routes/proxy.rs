//! `POST /api/analyze-resume`: pass-through to the Python analysis backend.
//!
//! The multipart body is relayed byte for byte under its original `Content-Type`, so every
//! field (`resume`, `jobDescription`, ...) reaches the backend with its name, file name, and
//! media type intact. Errors on this route use the backend's flat `{"error": "..."}` shape
//! rather than `AppError`'s envelope, so existing web clients keep working unchanged.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, info, warn};

use crate::state::AppState;

const FALLBACK_ERROR: &str = "Failed to analyze resume";

fn flat_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// POST /api/analyze-resume
pub async fn handle_analyze_proxy(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(status = %rejection.status(), "Proxy body rejected: {}", rejection.body_text());
            let message = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                "File is too large".to_string()
            } else {
                rejection.body_text()
            };
            return flat_error(rejection.status(), message);
        }
    };

    let content_type = match headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|ct| ct.starts_with("multipart/form-data"))
    {
        Some(ct) => ct.to_string(),
        None => {
            warn!("Proxy request is not multipart/form-data");
            return flat_error(
                StatusCode::BAD_REQUEST,
                "Expected a multipart/form-data body",
            );
        }
    };

    let url = &state.config.analysis_backend_url;
    let size = body.len();
    let response = match state.backend.post_raw(url, &content_type, body).await {
        Ok(response) => response,
        Err(e) => {
            error!(url = %url, "Analysis backend unreachable: {e}");
            return flat_error(StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_ERROR);
        }
    };

    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if !response.is_success() {
        let message = response
            .error_message()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_ERROR.to_string());
        return flat_error(status, message);
    }

    info!(size, status = response.status, "Relayed backend analysis");
    let content_type = response
        .content_type
        .unwrap_or_else(|| "application/json".to_string());
    (status, [(header::CONTENT_TYPE, content_type)], response.body).into_response()
}
