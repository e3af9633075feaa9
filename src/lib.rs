pub mod audio;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod logging;
pub mod nats;
pub mod playback;
pub mod presentation;
pub mod recognition;

pub use audio::{
    AudioFile, AudioFrame, CaptureDevice, CaptureDeviceFactory, CaptureSource, TapConfig,
};
pub use config::Config;
pub use controller::{
    ControllerOptions, ControllerStats, PermissionState, PlaybackState, RecognitionController,
    UNKNOWN_SONG,
};
pub use error::{ControllerError, Failure};
pub use http::{create_router, AppState};
pub use playback::{CommandPlayback, PlaybackService, PlaybackStatus};
pub use presentation::{AnimationTicker, FrameCycle};
pub use recognition::{
    MatchId, MatchResult, MediaItem, NatsRecognitionService, RecognitionService,
    RecognitionSession,
};
