use super::state::AppState;
use crate::controller::{ControllerStats, PlaybackState};
use crate::error::ControllerError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::{info, warn};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub state: PlaybackState,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct FrameResponse {
    pub frame: u32,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn player_response(state: &AppState) -> Json<PlayerResponse> {
    Json(PlayerResponse {
        state: state.controller.state(),
        label: state.controller.label(),
    })
}

fn conflict(e: ControllerError) -> axum::response::Response {
    warn!("Rejected player request: {}", e);
    (
        StatusCode::CONFLICT,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /player/start
pub async fn start_player(State(state): State<AppState>) -> impl IntoResponse {
    info!("Start requested");

    match state.controller.start().await {
        Ok(()) => (StatusCode::OK, player_response(&state)).into_response(),
        Err(e) => conflict(e),
    }
}

/// POST /player/stop
pub async fn stop_player(State(state): State<AppState>) -> impl IntoResponse {
    info!("Stop requested");

    match state.controller.stop().await {
        Ok(()) => (StatusCode::OK, player_response(&state)).into_response(),
        Err(e) => conflict(e),
    }
}

/// POST /player/toggle
/// Play when stopped, stop when playing
pub async fn toggle_player(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.toggle().await {
        Ok(new_state) => {
            info!("Toggled player to {:?}", new_state);
            (StatusCode::OK, player_response(&state)).into_response()
        }
        Err(e) => conflict(e),
    }
}

/// GET /player/status
pub async fn get_status(State(state): State<AppState>) -> Json<ControllerStats> {
    Json(state.controller.stats().await)
}

/// GET /player/now-playing
pub async fn get_now_playing(State(state): State<AppState>) -> impl IntoResponse {
    player_response(&state)
}

/// GET /animation/frame
pub async fn get_animation_frame(State(state): State<AppState>) -> impl IntoResponse {
    match &state.animation {
        Some(animation) => (
            StatusCode::OK,
            Json(FrameResponse {
                frame: animation.frame(),
            }),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Animation is not running".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
