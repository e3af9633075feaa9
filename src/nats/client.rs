use anyhow::{Context, Result};
use async_nats::Client;
use base64::Engine;
use tracing::{debug, info};

pub struct NatsClient {
    client: Client,
    subject_prefix: String,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str, subject_prefix: impl Into<String>) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self {
            client,
            subject_prefix: subject_prefix.into(),
        })
    }

    pub fn audio_subject(&self, session_id: &str) -> String {
        audio_subject(&self.subject_prefix, session_id)
    }

    pub fn result_subject(&self, session_id: &str) -> String {
        result_subject(&self.subject_prefix, session_id)
    }

    /// Publish audio frame to NATS
    pub async fn publish_audio_frame(
        &self,
        session_id: &str,
        pcm_bytes: &[u8],
        sample_rate: u32,
        channels: u16,
        sequence: u32,
        is_final: bool,
    ) -> Result<()> {
        let subject = self.audio_subject(session_id);

        let message = super::messages::AudioFrameMessage {
            session_id: session_id.to_string(),
            sequence,
            pcm: base64::engine::general_purpose::STANDARD.encode(pcm_bytes),
            sample_rate,
            channels,
            timestamp: chrono::Utc::now().to_rfc3339(),
            final_frame: is_final,
        };

        let payload = serde_json::to_vec(&message)?;

        self.client.publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish audio frame")?;

        debug!(
            "Published audio frame to {} (seq={}, bytes={}, final={})",
            subject, sequence, pcm_bytes.len(), is_final
        );

        Ok(())
    }

    /// Subscribe to recognition results for one session
    pub async fn subscribe_results(&self, session_id: &str) -> Result<async_nats::Subscriber> {
        let subject = self.result_subject(session_id);

        info!("Subscribing to recognition results on {}", subject);

        let subscriber = self.client.subscribe(subject.clone())
            .await
            .context("Failed to subscribe to recognition results")?;

        Ok(subscriber)
    }
}

pub fn audio_subject(prefix: &str, session_id: &str) -> String {
    format!("{}.audio.{}", prefix, session_id)
}

pub fn result_subject(prefix: &str, session_id: &str) -> String {
    format!("{}.result.{}", prefix, session_id)
}
