//! Report export: layout + PDF serialization for one request.
//!
//! Both steps are CPU-bound and run together inside `tokio::task::spawn_blocking`.
//! Inputs are moved into the closure, so concurrent exports share nothing.
//! Any failure discards the partial document; the caller gets an error and no bytes.

use bytes::Bytes;
use thiserror::Error;
use tracing::{error, info};

use crate::layout::{build_report_document, AfmMetrics};
use crate::models::analysis::AnalysisResult;
use crate::models::resume::StructuredResume;
use crate::pdf::{Metadata, PdfError, PdfWriter};

pub const REPORT_FILE_NAME: &str = "resume-analysis.pdf";
pub const REPORT_MEDIA_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] PdfError),

    #[error("export task failed: {0}")]
    Internal(String),
}

#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Bytes,
    pub page_count: usize,
}

/// Renders the analysis report (and optional optimized-resume page) to PDF bytes.
pub async fn render_report(
    analysis: AnalysisResult,
    resume: Option<StructuredResume>,
) -> Result<RenderedReport, ExportError> {
    let result = tokio::task::spawn_blocking(move || render_report_sync(&analysis, resume.as_ref()))
        .await
        .map_err(|e| ExportError::Internal(format!("spawn_blocking failed in export: {e}")))?;

    match &result {
        Ok(report) => info!(
            pages = report.page_count,
            bytes = report.bytes.len(),
            "Report exported"
        ),
        Err(e) => error!("Report export failed: {e}"),
    }
    result
}

pub(crate) fn render_report_sync(
    analysis: &AnalysisResult,
    resume: Option<&StructuredResume>,
) -> Result<RenderedReport, ExportError> {
    let document = build_report_document(analysis, resume, &AfmMetrics);
    let metadata = Metadata::for_document(&document);
    let bytes = PdfWriter::new().write(&document, &metadata)?;
    Ok(RenderedReport {
        bytes: Bytes::from(bytes),
        page_count: document.page_count(),
    })
}
