//! HTTP API
//!
//! Exposes the album and listing crawls as JSON endpoints, the debug dump
//! directory as static files and a small HTML overview at `/`.

mod docs;
pub mod params;
mod routes;

use crate::config::{validate, Config};
use crate::crawler::{Coordinator, HttpFetcher, PageFetcher};
use crate::output::DebugDumper;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub coordinator: Arc<Coordinator>,
}

impl AppState {
    pub fn new(config: Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        let dumper = DebugDumper::new(&config.server.debug_dir);
        Self {
            config: Arc::new(config),
            coordinator: Arc::new(Coordinator::new(fetcher, dumper)),
        }
    }
}

/// Builds the API router
pub fn router(state: AppState) -> Router {
    let dumps = ServeDir::new(state.coordinator.dumper().dir());

    Router::new()
        .route("/album", get(routes::album))
        .route("/zonerama-album", get(routes::album))
        .route("/listing", get(routes::listing))
        .route("/zonerama", get(routes::listing))
        .route("/health", get(routes::health))
        .route("/", get(routes::docs))
        .nest_service("/debuging", dumps)
        .fallback(routes::docs)
        .layer(CorsLayer::new().allow_origin(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Validates the configuration, binds the configured address and serves the
/// API until the process exits
pub async fn serve(config: Config) -> crate::Result<()> {
    validate(&config)?;
    let fetcher = HttpFetcher::new(&config.fetch)?;
    let bind = config.server.bind.clone();
    let app = router(AppState::new(config, Arc::new(fetcher)));

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("Listening on http://{}", bind);
    tracing::info!("API docs: http://{}/", bind);

    axum::serve(listener, app).await?;
    Ok(())
}
