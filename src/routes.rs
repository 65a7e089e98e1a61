// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{content, system},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the content pipeline under `/api/content`.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (configuration).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Skipping invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let content_routes = Router::new()
        .route("/normalize", post(content::normalize))
        .route("/render", post(content::render))
        .route("/plain-text", post(content::plain_text))
        .route("/excerpt", post(content::excerpt))
        .route("/preview", post(content::preview))
        .route("/batch-preview", post(content::batch_preview));

    Router::new()
        .route("/api/health", get(system::health))
        .nest("/api/content", content_routes)
        .fallback(system::not_found)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
