use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod analysis;
pub mod catalog;
pub mod error;
pub mod rest;

use analysis::AnalysisGateway;
use catalog::CatalogStore;

/// Shared by every request; holds no per-request state.
pub struct AppState {
    pub analyzer: AnalysisGateway,
    pub catalog: Arc<dyn CatalogStore>,
}

pub fn build_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/analyze", post(rest::api_analyze))
        .route("/top-selling", post(rest::api_top_selling))
        .route("/health", get(rest::health))
        .with_state(state)
        .layer(cors)
        // Method and path only; request bodies carry user text
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}
