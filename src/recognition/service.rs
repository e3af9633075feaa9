use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::types::MatchResult;
use crate::audio::AudioFrame;

/// Audio fingerprinting backend
///
/// Each session reports its results on the `events` channel handed to
/// [`RecognitionService::create_session`], any number of times, until it is
/// closed.
#[async_trait::async_trait]
pub trait RecognitionService: Send + Sync {
    async fn create_session(
        &self,
        events: mpsc::Sender<MatchResult>,
    ) -> Result<Arc<dyn RecognitionSession>>;

    /// Get service name for logging
    fn name(&self) -> &str;
}

/// A live matching session fed with a continuous stream of buffers
#[async_trait::async_trait]
pub trait RecognitionSession: Send + Sync {
    /// Session identifier for logging
    fn id(&self) -> &str;

    /// Feed one captured buffer
    async fn feed(&self, frame: AudioFrame) -> Result<()>;

    /// Release the session. No events are delivered afterwards.
    async fn close(&self) -> Result<()>;
}
