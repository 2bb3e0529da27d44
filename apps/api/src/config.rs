use anyhow::{bail, Context, Result};

pub const DEFAULT_ANALYSIS_BACKEND_URL: &str = "http://localhost:5000/api/analyze-resume";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Which provider implementations to wire into `AppState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMode {
    Mock,
    Http,
}

impl std::str::FromStr for ProviderMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(ProviderMode::Mock),
            "http" => Ok(ProviderMode::Http),
            other => bail!("PROVIDER_MODE must be 'mock' or 'http', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub provider_mode: ProviderMode,
    /// Target of the `/api/analyze-resume` proxy and of the HTTP analysis provider.
    pub analysis_backend_url: String,
    pub parse_backend_url: Option<String>,
    pub improve_backend_url: Option<String>,
    pub backend_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            provider_mode: get("PROVIDER_MODE")
                .unwrap_or_else(|| "mock".to_string())
                .parse()?,
            analysis_backend_url: get("ANALYSIS_BACKEND_URL")
                .or_else(|| get("PYTHON_API_URL"))
                .unwrap_or_else(|| DEFAULT_ANALYSIS_BACKEND_URL.to_string()),
            parse_backend_url: get("PARSE_BACKEND_URL"),
            improve_backend_url: get("IMPROVE_BACKEND_URL"),
            backend_timeout_secs: get("BACKEND_TIMEOUT_SECS")
                .unwrap_or_else(|| "60".to_string())
                .parse::<u64>()
                .context("BACKEND_TIMEOUT_SECS must be a whole number of seconds")?,
            max_upload_bytes: match get("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}
