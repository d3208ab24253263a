use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.replies.dir());
    let uploads_prefix = state.replies.url_prefix().to_string();

    let router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Chat round trip
        .route("/api/chat", post(handlers::chat));

    // Stored reply audio; an empty prefix serves the uploads dir at the root
    let router = if uploads_prefix.is_empty() {
        router.fallback_service(uploads)
    } else {
        router.nest_service(&uploads_prefix, uploads)
    };

    router
        // Browser clients may be served from another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
