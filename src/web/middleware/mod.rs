//! # Web API Middleware
//!
//! Authentication plus the ambient HTTP stack (tracing, CORS, timeout).

pub mod auth;

use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use auth::require_auth;

use crate::config::AppConfig;
use crate::web::state::AppState;

/// Apply the outer middleware stack: request tracing, CORS when enabled,
/// and the request timeout.
pub fn apply_middleware_stack(router: Router<AppState>, config: &AppConfig) -> Router<AppState> {
    let router = router
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http());

    if config.cors.enabled {
        router.layer(create_cors_layer())
    } else {
        router
    }
}

fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
