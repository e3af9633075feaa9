//! Audio fingerprint recognition
//!
//! The controller only sees the [`RecognitionService`] and
//! [`RecognitionSession`] traits; [`NatsRecognitionService`] talks to an
//! external fingerprinting worker over NATS.

pub mod nats;
pub mod service;
pub mod types;

pub use nats::{NatsRecognitionService, NatsRecognitionSession};
pub use service::{RecognitionService, RecognitionSession};
pub use types::{MatchId, MatchResult, MediaItem};
