//! API routes.

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::health::health;
use crate::handlers::scenes::{latest_scene, recurring_entities, scenes_in_range};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let scene_routes = Router::new()
        .route("/scenes", get(scenes_in_range))
        .route("/scenes/latest", get(latest_scene))
        .route("/scenes/recurring", get(recurring_entities));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health));

    Router::new()
        .nest("/api", scene_routes)
        .merge(health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        // Wide open; acceptable for a single-camera deployment on a
        // trusted network, lock down via CORS_ORIGINS elsewhere.
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
