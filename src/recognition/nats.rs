use anyhow::Result;
use futures::stream::StreamExt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::service::{RecognitionService, RecognitionSession};
use super::types::MatchResult;
use crate::audio::{convert, AudioFrame};
use crate::nats::{MatchMessage, MatchStatus, NatsClient};

/// Recognition backed by an external fingerprinting worker on NATS
///
/// Audio goes out on `{prefix}.audio.{session}`, results come back on
/// `{prefix}.result.{session}`.
pub struct NatsRecognitionService {
    client: Arc<NatsClient>,
    target_sample_rate: u32,
    target_channels: u16,
}

impl NatsRecognitionService {
    pub async fn connect(
        url: &str,
        subject_prefix: &str,
        target_sample_rate: u32,
        target_channels: u16,
    ) -> Result<Self> {
        let client = NatsClient::connect(url, subject_prefix).await?;

        Ok(Self {
            client: Arc::new(client),
            target_sample_rate,
            target_channels,
        })
    }
}

#[async_trait::async_trait]
impl RecognitionService for NatsRecognitionService {
    async fn create_session(
        &self,
        events: mpsc::Sender<MatchResult>,
    ) -> Result<Arc<dyn RecognitionSession>> {
        let session_id = format!("session-{}", uuid::Uuid::new_v4());
        info!("Creating recognition session: {}", session_id);

        let mut results = self.client.subscribe_results(&session_id).await?;

        let listener_id = session_id.clone();
        let listener = tokio::spawn(async move {
            debug!("Result listener started for {}", listener_id);

            while let Some(msg) = results.next().await {
                let message = match serde_json::from_slice::<MatchMessage>(&msg.payload) {
                    Ok(message) => message,
                    Err(e) => {
                        warn!("Failed to parse match message: {}", e);
                        continue;
                    }
                };

                if message.session_id != listener_id {
                    continue;
                }

                if message.status == MatchStatus::NoMatch {
                    debug!(
                        "No match for signature: {}",
                        message.error.as_deref().unwrap_or("no error")
                    );
                }

                let Some(result) = message.into_result() else {
                    debug!("Match message without media items, ignoring");
                    continue;
                };

                if events.send(result).await.is_err() {
                    break;
                }
            }

            debug!("Result listener stopped for {}", listener_id);
        });

        Ok(Arc::new(NatsRecognitionSession {
            client: Arc::clone(&self.client),
            session_id,
            sequence: AtomicU32::new(0),
            closed: AtomicBool::new(false),
            listener: Mutex::new(Some(listener)),
            target_sample_rate: self.target_sample_rate,
            target_channels: self.target_channels,
        }))
    }

    fn name(&self) -> &str {
        "NATS recognizer"
    }
}

pub struct NatsRecognitionSession {
    client: Arc<NatsClient>,
    session_id: String,
    sequence: AtomicU32,
    closed: AtomicBool,
    listener: Mutex<Option<JoinHandle<()>>>,
    target_sample_rate: u32,
    target_channels: u16,
}

#[async_trait::async_trait]
impl RecognitionSession for NatsRecognitionSession {
    fn id(&self) -> &str {
        &self.session_id
    }

    async fn feed(&self, frame: AudioFrame) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            anyhow::bail!("Recognition session {} is closed", self.session_id);
        }

        let frame = convert::prepare_frame(frame, self.target_sample_rate, self.target_channels);
        let pcm_bytes = convert::to_pcm_bytes(&frame);
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);

        self.client
            .publish_audio_frame(
                &self.session_id,
                &pcm_bytes,
                frame.sample_rate,
                frame.channels,
                seq,
                false,
            )
            .await
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        info!("Closing recognition session: {}", self.session_id);

        // Send final frame
        if let Err(e) = self
            .client
            .publish_audio_frame(
                &self.session_id,
                &[],
                self.target_sample_rate,
                self.target_channels,
                self.sequence.load(Ordering::SeqCst),
                true,
            )
            .await
        {
            error!("Failed to send final frame: {}", e);
        }

        let listener = match self.listener.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(listener) = listener {
            listener.abort();
            if let Err(e) = listener.await {
                if !e.is_cancelled() {
                    error!("Result listener panicked: {}", e);
                }
            }
        }

        Ok(())
    }
}
