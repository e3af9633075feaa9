use serde::Serialize;
use thiserror::Error;

/// Caller contract violations on the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("playback is already started")]
    AlreadyStarted,

    #[error("playback is not started")]
    NotStarted,
}

/// Failures absorbed by the controller
///
/// These are logged and recorded in the stats, never returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Failure {
    #[error("capture permission denied")]
    PermissionDenied,

    #[error("playback failed to start: {0}")]
    PlaybackStartFailure(String),

    #[error("recognition session could not be attached: {0}")]
    SessionAttachFailure(String),

    #[error("recognition session error: {0}")]
    SessionError(String),
}
