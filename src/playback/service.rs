use anyhow::Result;
use serde::Serialize;
use std::fmt;

/// Status reported by a playback service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlaybackStatus {
    /// Nothing has been started, or playback was stopped
    Idle,
    /// The stream is being played
    Playing,
    /// Playback ended on its own
    Exited { code: Option<i32> },
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackStatus::Idle => write!(f, "idle"),
            PlaybackStatus::Playing => write!(f, "playing"),
            PlaybackStatus::Exited { code: Some(code) } => write!(f, "exited ({})", code),
            PlaybackStatus::Exited { code: None } => write!(f, "exited (signal)"),
        }
    }
}

/// Network stream playback
///
/// Transport and decoding live behind this trait.
#[async_trait::async_trait]
pub trait PlaybackService: Send + Sync {
    /// Begin playing the stream at `url`
    async fn play(&mut self, url: &str) -> Result<()>;

    /// Stop playback
    async fn stop(&mut self) -> Result<()>;

    /// Current status, used for diagnostics
    async fn status(&mut self) -> PlaybackStatus;

    /// Get service name for logging
    fn name(&self) -> &str;
}
