//! HTTP API for the presentation shell
//!
//! - POST /player/start - Start playback and recognition
//! - POST /player/stop - Stop playback and recognition
//! - POST /player/toggle - Start or stop, whichever applies
//! - GET /player/status - Controller statistics
//! - GET /player/now-playing - Current label and playback state
//! - GET /animation/frame - Current animation frame
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, FrameResponse, PlayerResponse};
pub use routes::create_router;
pub use state::AppState;
