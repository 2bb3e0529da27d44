use crate::config::Config;
use crate::providers::http::BackendClient;
use crate::providers::Providers;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; each request builds its own `AnalysisSession`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Analysis, parse, and improve collaborators. Mock or HTTP, per `PROVIDER_MODE`.
    pub providers: Providers,
    /// Raw client for the `/api/analyze-resume` pass-through.
    pub backend: BackendClient,
}
