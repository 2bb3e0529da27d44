//! Per-request analysis state.
//!
//! Upload and report-generation progress live in an explicit value that handlers
//! create, pass down, and drop at the end of the request. Nothing here is shared
//! between requests.

use bytes::Bytes;
use serde::Serialize;

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum UploadStatus {
    Idle,
    Uploading,
    #[serde(rename_all = "camelCase")]
    Uploaded { file_name: String, size: usize },
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStatus {
    NotGenerated,
    Generating,
    Generated { bytes: Bytes },
}

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    pub upload: UploadStatus,
    pub generation: GenerationStatus,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            upload: UploadStatus::Idle,
            generation: GenerationStatus::NotGenerated,
        }
    }

    pub fn begin_upload(&mut self) -> Result<(), AppError> {
        match self.upload {
            UploadStatus::Uploading => Err(AppError::Validation(
                "An upload is already in progress".to_string(),
            )),
            _ => {
                self.upload = UploadStatus::Uploading;
                Ok(())
            }
        }
    }

    pub fn finish_upload(&mut self, file_name: &str, size: usize) {
        self.upload = UploadStatus::Uploaded {
            file_name: file_name.to_string(),
            size,
        };
    }

    pub fn reject_upload(&mut self, reason: impl Into<String>) {
        self.upload = UploadStatus::Rejected {
            reason: reason.into(),
        };
    }

    pub fn begin_generation(&mut self) -> Result<(), AppError> {
        if self.generation == GenerationStatus::Generating {
            return Err(AppError::Validation(
                "Report generation already in progress".to_string(),
            ));
        }
        self.generation = GenerationStatus::Generating;
        Ok(())
    }

    pub fn finish_generation(&mut self, bytes: Bytes) {
        self.generation = GenerationStatus::Generated { bytes };
    }

    /// A failed export leaves no artifact behind.
    pub fn fail_generation(&mut self) {
        self.generation = GenerationStatus::NotGenerated;
    }

    pub fn generated_bytes(&self) -> Option<&Bytes> {
        match &self.generation {
            GenerationStatus::Generated { bytes } => Some(bytes),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = AnalysisSession::new();
        assert_eq!(session.upload, UploadStatus::Idle);
        assert_eq!(session.generation, GenerationStatus::NotGenerated);
    }

    #[test]
    fn test_upload_lifecycle() {
        let mut session = AnalysisSession::new();
        session.begin_upload().unwrap();
        assert!(session.begin_upload().is_err(), "double upload must fail");
        session.finish_upload("cv.pdf", 42);
        assert_eq!(
            session.upload,
            UploadStatus::Uploaded {
                file_name: "cv.pdf".to_string(),
                size: 42
            }
        );
    }

    #[test]
    fn test_failed_generation_resets_to_not_generated() {
        let mut session = AnalysisSession::new();
        session.begin_generation().unwrap();
        session.fail_generation();
        assert_eq!(session.generation, GenerationStatus::NotGenerated);
        assert!(session.generated_bytes().is_none());
    }

    #[test]
    fn test_generation_can_be_repeated_after_success() {
        let mut session = AnalysisSession::new();
        session.begin_generation().unwrap();
        session.finish_generation(Bytes::from_static(b"%PDF"));
        assert_eq!(session.generated_bytes().map(|b| b.len()), Some(4));
        assert!(session.begin_generation().is_ok());
    }

    #[test]
    fn test_upload_status_serializes_tagged() {
        let status = UploadStatus::Uploaded {
            file_name: "cv.pdf".to_string(),
            size: 7,
        };
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["state"], "uploaded");
        assert_eq!(value["fileName"], "cv.pdf");
    }
}
