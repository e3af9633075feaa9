use chrono::{DateTime, Utc};
use serde::Serialize;

use super::state::{PermissionState, PlaybackState};
use crate::error::Failure;

/// Snapshot of the controller for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ControllerStats {
    /// Whether the stream is playing
    pub state: PlaybackState,

    /// Current "now playing" label
    pub label: String,

    /// Outcome of the last capture permission request
    pub permission: PermissionState,

    /// When the current playback started
    pub started_at: Option<DateTime<Utc>>,

    /// Playback duration in seconds, zero while stopped
    pub duration_secs: f64,

    /// Recognition sessions opened since startup
    pub sessions_opened: u64,

    /// Buffers fed into recognition sessions since startup
    pub buffers_forwarded: u64,

    /// Number of label changes since startup
    pub label_updates: u64,

    /// Session errors reported by the recognizer since startup
    pub session_errors: u64,

    /// Most recent absorbed failure
    pub last_failure: Option<Failure>,
}
