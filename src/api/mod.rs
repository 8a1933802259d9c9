//! HTTP surface

pub mod error;
pub mod handlers;

use std::path::Path;
use std::sync::Arc;

use axum::{Router, http::HeaderValue, routing::get};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::warn;

use crate::core::{RateConversionService, config::ServerConfig};

pub struct AppState {
    pub service: RateConversionService,
}

impl AppState {
    pub fn new(service: RateConversionService) -> Arc<Self> {
        Arc::new(AppState { service })
    }
}

pub fn app_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            "/exchange-rate/{from}/{to}/{amount}",
            get(handlers::exchange_rate),
        )
        .route("/historical-rates/{from}/{to}", get(handlers::historical_rates))
        .fallback(handlers::not_found)
        .with_state(state);

    let mut router = Router::new().nest("/api", api);

    // Front-end page and its assets
    if let Some(dir) = &config.static_dir {
        let index = Path::new(dir).join("index.html");
        router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    router
        .layer(cors_layer(&config.cors_allow_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed: &[String]) -> CorsLayer {
    if allowed.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }

    let origins = allowed
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(AllowOrigin::list(origins))
}
