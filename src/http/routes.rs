use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Player control
        .route("/player/start", post(handlers::start_player))
        .route("/player/stop", post(handlers::stop_player))
        .route("/player/toggle", post(handlers::toggle_player))
        // Player queries
        .route("/player/status", get(handlers::get_status))
        .route("/player/now-playing", get(handlers::get_now_playing))
        .route("/animation/frame", get(handlers::get_animation_frame))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
