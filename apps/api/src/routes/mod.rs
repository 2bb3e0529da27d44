pub mod analysis;
pub mod health;
pub mod improve;
pub mod proxy;
pub mod report;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Headroom for multipart boundaries and headers on top of the file-size limit,
/// so an oversized file reaches `UploadedFile::validate` and gets a 413.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    Router::new()
        .route("/health", get(health::health_handler))
        // Pass-through for the web client
        .route("/api/analyze-resume", post(proxy::handle_analyze_proxy))
        .route("/api/v1/analysis", post(analysis::handle_analysis))
        .route("/api/v1/improve", post(improve::handle_improve))
        .route("/api/v1/report", post(report::handle_report))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::extract::Multipart;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::providers::http::tests::{echo_upload, spawn_backend};
    use crate::providers::http::BackendClient;
    use crate::providers::mock::{
        mock_analysis, mock_resume, MockAnalysisProvider, MockImprovementGenerator,
        MockResumeParser, MOCK_IMPROVED_RESUME,
    };
    use crate::providers::Providers;

    const BOUNDARY: &str = "resume-report-boundary";

    fn test_state(analysis_backend_url: &str) -> AppState {
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.analysis_backend_url = analysis_backend_url.to_string();
        config.max_upload_bytes = 1024;
        AppState {
            config,
            providers: Providers {
                analyzer: Arc::new(MockAnalysisProvider {
                    latency: Duration::ZERO,
                }),
                parser: Arc::new(MockResumeParser {
                    latency: Duration::ZERO,
                }),
                improver: Arc::new(MockImprovementGenerator {
                    latency: Duration::ZERO,
                }),
            },
            backend: BackendClient::new(Duration::from_secs(5)).unwrap(),
        }
    }

    fn app() -> Router {
        build_router(test_state("http://127.0.0.1:9/unused"))
    }

    fn multipart_request(
        uri: &str,
        field: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Request<Body> {
        form_request(uri, &[(field, Some((file_name, content_type)), data)])
    }

    /// Builds a multipart request from `(name, file, data)` parts, where `file` carries
    /// the file name and media type of file parts.
    fn form_request(uri: &str, parts: &[(&str, Option<(&str, &str)>, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, file, data) in parts {
            let disposition = match file {
                Some((file_name, content_type)) => format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n"
                ),
                None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n"),
            };
            body.extend_from_slice(format!("--{BOUNDARY}\r\n{disposition}\r\n").as_bytes());
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    /// Backend that reports every part it received, in order.
    async fn list_fields(mut multipart: Multipart) -> Json<Value> {
        let mut fields = Vec::new();
        let mut parts = serde_json::Map::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.unwrap();
            parts.insert(
                name.clone(),
                json!({ "fileName": file_name, "contentType": content_type, "bytes": bytes.to_vec() }),
            );
            fields.push(name);
        }
        Json(json!({ "fields": fields, "parts": parts }))
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-report-api");
    }

    // ── /api/v1/analysis ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_analysis_returns_analysis_resume_and_upload() {
        let request = multipart_request("/api/v1/analysis", "resume", "cv.txt", "text/plain", b"Jane Roe");
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["analysis"]["score"], 78);
        assert_eq!(body["analysis"]["atsCompatibility"]["score"], 85);
        assert_eq!(body["resume"]["personalInfo"]["name"], "John Doe");
        assert_eq!(body["upload"]["state"], "uploaded");
        assert_eq!(body["upload"]["fileName"], "cv.txt");
        assert_eq!(body["upload"]["size"], 8);
    }

    #[tokio::test]
    async fn test_analysis_rejects_unsupported_type() {
        let request = multipart_request("/api/v1/analysis", "resume", "cv.zip", "application/zip", b"PK");
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body_json(response).await["error"]["code"], "INVALID_FILE_TYPE");
    }

    #[tokio::test]
    async fn test_analysis_rejects_oversized_file() {
        let data = vec![b'a'; 2048];
        let request = multipart_request("/api/v1/analysis", "resume", "cv.txt", "text/plain", &data);
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_analysis_requires_resume_field() {
        let request = multipart_request("/api/v1/analysis", "attachment", "cv.txt", "text/plain", b"x");
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "No resume file provided"
        );
    }

    // ── /api/v1/improve ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_improve() {
        let request = json_request("/api/v1/improve", json!({ "resumeText": "Jane Roe" }));
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["improvedResume"], MOCK_IMPROVED_RESUME);
    }

    #[tokio::test]
    async fn test_improve_rejects_blank_text() {
        let request = json_request("/api/v1/improve", json!({ "resumeText": "   " }));
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── /api/v1/report ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_report_is_pdf_attachment() {
        let request = json_request(
            "/api/v1/report",
            json!({ "analysis": mock_analysis(), "resume": mock_resume() }),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume-analysis.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.ends_with(b"%%EOF\n"));
    }

    #[tokio::test]
    async fn test_report_rejects_out_of_range_score() {
        let mut analysis = serde_json::to_value(mock_analysis()).unwrap();
        analysis["score"] = json!(101);
        let response = app()
            .oneshot(json_request("/api/v1/report", json!({ "analysis": analysis })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_report_unencodable_text_is_generation_error() {
        let mut analysis = mock_analysis();
        analysis.suggestions = vec!["履歴書を短くする".to_string()];
        let response = app()
            .oneshot(json_request("/api/v1/report", json!({ "analysis": analysis })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "DOCUMENT_GENERATION_ERROR"
        );
    }

    #[tokio::test]
    async fn test_report_malformed_payload_is_validation_error() {
        let response = app()
            .oneshot(json_request("/api/v1/report", json!({ "resume": {} })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── /api/analyze-resume ─────────────────────────────────────────────────

    #[tokio::test]
    async fn test_proxy_relays_backend_body_verbatim() {
        let base = spawn_backend(Router::new().route("/analyze", post(echo_upload))).await;
        let app = build_router(test_state(&format!("{base}/analyze")));
        let request = multipart_request("/api/analyze-resume", "resume", "cv.pdf", "application/pdf", b"%PDF-1.4");
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["fileName"], "cv.pdf");
        assert_eq!(body["contentType"], "application/pdf");
        assert_eq!(body["text"], "%PDF-1.4");
    }

    #[tokio::test]
    async fn test_proxy_relays_backend_error_status() {
        let backend = Router::new().route(
            "/analyze",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "No resume file selected" })),
                )
            }),
        );
        let base = spawn_backend(backend).await;
        let app = build_router(test_state(&format!("{base}/analyze")));
        let request = multipart_request("/api/analyze-resume", "resume", "cv.pdf", "application/pdf", b"x");
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "No resume file selected" }));
    }

    #[tokio::test]
    async fn test_proxy_defaults_error_message() {
        let backend = Router::new().route(
            "/analyze",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
        );
        let base = spawn_backend(backend).await;
        let app = build_router(test_state(&format!("{base}/analyze")));
        let request = multipart_request("/api/analyze-resume", "resume", "cv.pdf", "application/pdf", b"x");
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await, json!({ "error": "Failed to analyze resume" }));
    }

    #[tokio::test]
    async fn test_proxy_network_failure_is_500() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let app = build_router(test_state(&format!("http://{addr}/analyze")));
        let request = multipart_request("/api/analyze-resume", "resume", "cv.pdf", "application/pdf", b"x");
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "Failed to analyze resume" }));
    }

    #[tokio::test]
    async fn test_proxy_forwards_every_form_field() {
        let base = spawn_backend(Router::new().route("/analyze", post(list_fields))).await;
        let app = build_router(test_state(&format!("{base}/analyze")));
        let request = form_request(
            "/api/analyze-resume",
            &[
                ("resume", Some(("cv.txt", "text/plain")), &b"Jane Roe"[..]),
                ("jobDescription", None, &b"Senior Rust engineer"[..]),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["fields"], json!(["resume", "jobDescription"]));
        assert_eq!(body["parts"]["resume"]["fileName"], "cv.txt");
        assert_eq!(body["parts"]["resume"]["contentType"], "text/plain");
        assert_eq!(
            body["parts"]["jobDescription"]["bytes"],
            json!(b"Senior Rust engineer".to_vec())
        );
        assert_eq!(body["parts"]["jobDescription"]["fileName"], Value::Null);
    }

    #[tokio::test]
    async fn test_proxy_forwards_binary_file_bytes() {
        let base = spawn_backend(Router::new().route("/analyze", post(list_fields))).await;
        let app = build_router(test_state(&format!("{base}/analyze")));
        let data: &[u8] = &[0x25, 0x50, 0x44, 0x46, 0x00, 0xFF, 0xFE, 0x80, 0xC3];
        let request = multipart_request("/api/analyze-resume", "resume", "cv.pdf", "application/pdf", data);
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["parts"]["resume"]["bytes"], json!(data.to_vec()));
        assert_eq!(body["parts"]["resume"]["contentType"], "application/pdf");
    }

    #[tokio::test]
    async fn test_proxy_oversized_body_is_413() {
        let data = vec![b'a'; 1024 + MULTIPART_OVERHEAD_BYTES + 1];
        let request = multipart_request("/api/analyze-resume", "resume", "cv.txt", "text/plain", &data);
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await, json!({ "error": "File is too large" }));
    }

    #[tokio::test]
    async fn test_proxy_requires_multipart_body() {
        let request = json_request("/api/analyze-resume", json!({ "resume": "Jane Roe" }));
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
