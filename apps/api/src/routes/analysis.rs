use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::models::resume::StructuredResume;
use crate::models::session::{AnalysisSession, UploadStatus};
use crate::models::upload::{read_resume_field, UploadedFile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: AnalysisResult,
    pub resume: StructuredResume,
    pub upload: UploadStatus,
}

async fn accept_upload(
    session: &mut AnalysisSession,
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<UploadedFile, AppError> {
    session.begin_upload()?;
    let file = read_resume_field(multipart)
        .await
        .and_then(|file| file.validate(max_bytes).map(|_| file));
    match file {
        Ok(file) => {
            session.finish_upload(&file.file_name, file.size());
            Ok(file)
        }
        Err(e) => {
            warn!("Upload rejected: {e}");
            session.reject_upload(e.to_string());
            Err(e)
        }
    }
}

/// POST /api/v1/analysis
/// Validates the uploaded resume, then parses and analyzes it concurrently.
pub async fn handle_analysis(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut session = AnalysisSession::new();
    let file = accept_upload(&mut session, &mut multipart, state.config.max_upload_bytes).await?;

    let text = file.text_lossy();
    let providers = &state.providers;
    let (resume, analysis) = tokio::try_join!(
        async { providers.parser.parse(&file).await.map_err(AppError::Parse) },
        async {
            providers
                .analyzer
                .analyze(&text)
                .await
                .map_err(AppError::Analysis)
        },
    )?;

    info!(
        file = %file.file_name,
        score = analysis.overall_score,
        backend = providers.analyzer.backend(),
        "Resume analyzed"
    );

    Ok(Json(AnalysisResponse {
        analysis,
        resume,
        upload: session.upload,
    }))
}
