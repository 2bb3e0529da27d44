//! Analysis collaborators: pluggable trait-based providers for analysis, parsing,
//! and resume improvement.
//!
//! Each trait has a mock backend (fixed delay, constant payload) and an HTTP backend
//! that calls the external analysis service. `AppState` holds `Arc<dyn _>` handles,
//! chosen at startup from `PROVIDER_MODE`.

pub mod http;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, ProviderMode};
use crate::models::analysis::AnalysisResult;
use crate::models::resume::StructuredResume;
use crate::models::upload::UploadedFile;

use self::http::{BackendClient, HttpAnalysisProvider, HttpImprovementGenerator, HttpResumeParser};
use self::mock::{MockAnalysisProvider, MockImprovementGenerator, MockResumeParser};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Failed(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definitions
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, resume_text: &str) -> Result<AnalysisResult, ProviderError>;

    /// Short backend label for logs ("mock" | "http").
    fn backend(&self) -> &'static str;
}

#[async_trait]
pub trait ResumeParser: Send + Sync {
    async fn parse(&self, file: &UploadedFile) -> Result<StructuredResume, ProviderError>;
}

#[async_trait]
pub trait ImprovementGenerator: Send + Sync {
    async fn improve(&self, resume_text: &str) -> Result<String, ProviderError>;
}

/// The three collaborators, as carried in `AppState`.
#[derive(Clone)]
pub struct Providers {
    pub analyzer: Arc<dyn AnalysisProvider>,
    pub parser: Arc<dyn ResumeParser>,
    pub improver: Arc<dyn ImprovementGenerator>,
}

impl Providers {
    pub fn mock() -> Self {
        Self {
            analyzer: Arc::new(MockAnalysisProvider::default()),
            parser: Arc::new(MockResumeParser::default()),
            improver: Arc::new(MockImprovementGenerator::default()),
        }
    }

    /// Builds providers for the configured mode. HTTP mode shares `backend`'s client.
    pub fn from_config(config: &Config, backend: &BackendClient) -> anyhow::Result<Self> {
        match config.provider_mode {
            ProviderMode::Mock => Ok(Self::mock()),
            ProviderMode::Http => {
                let parse_url = config.parse_backend_url.clone().ok_or_else(|| {
                    anyhow::anyhow!("PARSE_BACKEND_URL is required when PROVIDER_MODE=http")
                })?;
                let improve_url = config.improve_backend_url.clone().ok_or_else(|| {
                    anyhow::anyhow!("IMPROVE_BACKEND_URL is required when PROVIDER_MODE=http")
                })?;
                Ok(Self {
                    analyzer: Arc::new(HttpAnalysisProvider::new(
                        backend.clone(),
                        config.analysis_backend_url.clone(),
                    )),
                    parser: Arc::new(HttpResumeParser::new(backend.clone(), parse_url)),
                    improver: Arc::new(HttpImprovementGenerator::new(
                        backend.clone(),
                        improve_url,
                    )),
                })
            }
        }
    }
}
