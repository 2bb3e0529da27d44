use axum::{
    extract::rejection::JsonRejection,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::export::{render_report, REPORT_FILE_NAME, REPORT_MEDIA_TYPE};
use crate::models::analysis::AnalysisResult;
use crate::models::resume::StructuredResume;
use crate::models::session::AnalysisSession;

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub analysis: AnalysisResult,
    #[serde(default)]
    pub resume: Option<StructuredResume>,
}

/// POST /api/v1/report
/// Renders the analysis (and the optimized resume, when it has content) as a PDF download.
pub async fn handle_report(
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    req.analysis.validate()?;

    let mut session = AnalysisSession::new();
    session.begin_generation()?;
    let report = match render_report(req.analysis, req.resume).await {
        Ok(report) => report,
        Err(e) => {
            session.fail_generation();
            return Err(e.into());
        }
    };
    session.finish_generation(report.bytes);
    let bytes = session.generated_bytes().cloned().unwrap_or_default();

    let headers = [
        (header::CONTENT_TYPE, REPORT_MEDIA_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{REPORT_FILE_NAME}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}
