pub mod api;
pub mod core;
pub mod providers;

use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::AppState;
use crate::core::{RateConversionService, config::AppConfig};
use crate::providers::ExchangeRateApiProvider;

/// Load configuration from `config_path`, or the default location plus environment.
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path)?.with_env_overrides(),
        None => AppConfig::load(),
    }
}

/// Wire provider, service and routes for `config`.
pub fn build_app(config: &AppConfig) -> Result<Router> {
    if config.provider.api_key.is_none() {
        warn!("EXCHANGERATE_API_KEY is not set, rate lookups will fail until it is configured");
    }

    let provider = ExchangeRateApiProvider::from_config(&config.provider)
        .context("Failed to build rate provider client")?;
    let service = RateConversionService::new(Arc::new(provider));
    Ok(api::app_router(AppState::new(service), &config.server))
}

pub async fn run(config_path: Option<&str>) -> Result<()> {
    info!("Exchange rate service starting...");

    let config = load_config(config_path)?;
    debug!(
        listen_addr = %config.server.listen_addr,
        provider = %config.provider.base_url,
        static_dir = ?config.server.static_dir,
        "Loaded config"
    );

    let router = build_app(&config)?;
    let listener = tokio::net::TcpListener::bind(config.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;
    info!("Listening on {}", config.server.listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
