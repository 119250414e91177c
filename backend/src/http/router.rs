//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use super::ws;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    let api_v1 = Router::new()
        .route("/units/{unit}/production", get(handlers::get_production))
        .route("/units/{unit}/hourly", get(handlers::get_hourly))
        .route("/shifts/current", get(handlers::current_shift))
        .route("/subscriptions", get(handlers::list_subscriptions));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/units", get(handlers::list_units))
        .route("/ws/{unit}", get(ws::ws_production))
        .route("/ws/hourly/{unit}", get(ws::ws_hourly))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::db::repositories::LocalRepository;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state);
        // If we got here, router was created successfully
    }

    #[test]
    fn test_cors_with_explicit_origins() {
        let _layer = cors_layer(&["http://localhost:8000".to_string(), "bad\norigin".to_string()]);
    }
}
