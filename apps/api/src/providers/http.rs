//! HTTP backend client. The single point of entry for calls to the external
//! analysis service.
//!
//! `BackendClient` only moves bytes: it posts multipart, JSON, or untouched raw bodies
//! and hands back the status and raw body. The proxy route relays that verbatim; the
//! providers below decode it.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::analysis::AnalysisResult;
use crate::models::resume::StructuredResume;
use crate::models::upload::{UploadedFile, RESUME_FIELD};
use crate::providers::{AnalysisProvider, ImprovementGenerator, ProviderError, ResumeParser};

/// Status and body of a backend response, untouched.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl BackendResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The backend's `{"error": "..."}` message, if the body has one.
    pub fn error_message(&self) -> Option<String> {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: String,
        }
        serde_json::from_slice::<ErrorBody>(&self.body)
            .ok()
            .map(|b| b.error)
    }

    /// Decodes a success body, or turns a non-success into `ProviderError::Backend`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ProviderError> {
        if !self.is_success() {
            let message = self
                .error_message()
                .unwrap_or_else(|| String::from_utf8_lossy(&self.body).into_owned());
            return Err(ProviderError::Backend {
                status: self.status,
                message,
            });
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
}

impl BackendClient {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Posts `file` as the `resume` part of a multipart form, keeping its name and media type.
    pub async fn post_file(
        &self,
        url: &str,
        file: &UploadedFile,
    ) -> Result<BackendResponse, ProviderError> {
        let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.file_name.clone());
        if !file.content_type.is_empty() {
            part = part.mime_str(&file.content_type)?;
        }
        let form = Form::new().part(RESUME_FIELD, part);

        debug!(url, file = %file.file_name, size = file.size(), "Forwarding file to backend");
        let response = self.client.post(url).multipart(form).send().await?;
        Self::collect(response).await
    }

    /// Posts `body` as-is under the caller's `Content-Type`, boundary included.
    pub async fn post_raw(
        &self,
        url: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<BackendResponse, ProviderError> {
        debug!(url, size = body.len(), "Relaying raw body to backend");
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        Self::collect(response).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<BackendResponse, ProviderError> {
        let response = self.client.post(url).json(body).send().await?;
        Self::collect(response).await
    }

    async fn collect(response: reqwest::Response) -> Result<BackendResponse, ProviderError> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;
        if !(200..300).contains(&status) {
            warn!(status, "Backend returned non-success status");
        }
        Ok(BackendResponse {
            status,
            content_type,
            body,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Providers
// ────────────────────────────────────────────────────────────────────────────

/// Sends resume text to the analysis backend as a plain-text `resume` upload.
pub struct HttpAnalysisProvider {
    backend: BackendClient,
    url: String,
}

impl HttpAnalysisProvider {
    pub fn new(backend: BackendClient, url: String) -> Self {
        Self { backend, url }
    }
}

#[async_trait]
impl AnalysisProvider for HttpAnalysisProvider {
    async fn analyze(&self, resume_text: &str) -> Result<AnalysisResult, ProviderError> {
        let file = UploadedFile {
            file_name: "resume.txt".to_string(),
            content_type: "text/plain".to_string(),
            bytes: Bytes::copy_from_slice(resume_text.as_bytes()),
        };
        let result: AnalysisResult = self.backend.post_file(&self.url, &file).await?.decode()?;
        if result.validate().is_err() {
            return Err(ProviderError::Failed(
                "backend returned scores outside 0..=100".to_string(),
            ));
        }
        Ok(result)
    }

    fn backend(&self) -> &'static str {
        "http"
    }
}

/// Forwards the uploaded file to the parse backend.
pub struct HttpResumeParser {
    backend: BackendClient,
    url: String,
}

impl HttpResumeParser {
    pub fn new(backend: BackendClient, url: String) -> Self {
        Self { backend, url }
    }
}

#[async_trait]
impl ResumeParser for HttpResumeParser {
    async fn parse(&self, file: &UploadedFile) -> Result<StructuredResume, ProviderError> {
        self.backend.post_file(&self.url, file).await?.decode()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImproveRequest<'a> {
    resume_text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImproveResponse {
    improved_resume: String,
}

pub struct HttpImprovementGenerator {
    backend: BackendClient,
    url: String,
}

impl HttpImprovementGenerator {
    pub fn new(backend: BackendClient, url: String) -> Self {
        Self { backend, url }
    }
}

#[async_trait]
impl ImprovementGenerator for HttpImprovementGenerator {
    async fn improve(&self, resume_text: &str) -> Result<String, ProviderError> {
        let response: ImproveResponse = self
            .backend
            .post_json(&self.url, &ImproveRequest { resume_text })
            .await?
            .decode()?;
        Ok(response.improved_resume)
    }
}
