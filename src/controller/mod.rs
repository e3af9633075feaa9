//! Song recognition session control
//!
//! This module provides the `RecognitionController` that manages:
//! - Starting and stopping stream playback
//! - One live recognition session fed from a capture tap while playing
//! - Deduplication of repeated matches
//! - The observable "now playing" label and playback state

mod controller;
mod state;
mod stats;

pub use controller::{ControllerOptions, RecognitionController};
pub use state::{NowPlaying, PermissionState, PlaybackState, UNKNOWN_SONG};
pub use stats::ControllerStats;
