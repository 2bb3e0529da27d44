mod config;
mod errors;
mod export;
mod layout;
mod models;
mod pdf;
mod providers;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::providers::http::BackendClient;
use crate::providers::Providers;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Report API v{}", env!("CARGO_PKG_VERSION"));

    // Shared outbound client for the proxy and the HTTP providers
    let backend = BackendClient::new(Duration::from_secs(config.backend_timeout_secs))
        .context("failed to build backend HTTP client")?;
    info!(
        "Analysis backend: {} (timeout {}s)",
        config.analysis_backend_url, config.backend_timeout_secs
    );

    let providers = Providers::from_config(&config, &backend)?;
    info!(
        "Providers initialized (mode: {:?}, analyzer: {})",
        config.provider_mode,
        providers.analyzer.backend()
    );

    let state = AppState {
        config: config.clone(),
        providers,
        backend,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
