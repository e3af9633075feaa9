use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;

use super::backend::{AudioFrame, CaptureDevice, TapConfig};
use super::tap::TapSlot;

/// Capture device producing zero-filled buffers at the tap cadence
#[derive(Default)]
pub struct SilenceCaptureDevice {
    tap: TapSlot,
}

impl SilenceCaptureDevice {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CaptureDevice for SilenceCaptureDevice {
    async fn request_permission(&self) -> Result<bool> {
        Ok(true)
    }

    async fn install_tap(&self, config: TapConfig) -> Result<mpsc::Receiver<AudioFrame>> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(100);

        info!(
            "Installing silence tap ({}Hz, {} channels, {} frames per buffer)",
            config.sample_rate, config.channels, config.buffer_size
        );

        self.tap.install(async move {
            let mut ticker = tokio::time::interval(config.buffer_period());
            let mut frames_delivered = 0u64;

            loop {
                ticker.tick().await;

                let frame = AudioFrame {
                    samples: vec![0i16; config.buffer_size * config.channels as usize],
                    sample_rate: config.sample_rate,
                    channels: config.channels,
                    timestamp_ms: frames_delivered * 1000 / config.sample_rate as u64,
                };
                frames_delivered += config.buffer_size as u64;

                if tx.send(frame).await.is_err() {
                    break;
                }
            }
        })?;

        Ok(rx)
    }

    async fn remove_tap(&self) -> Result<()> {
        self.tap.remove().await;
        Ok(())
    }

    fn is_tapped(&self) -> bool {
        self.tap.is_active()
    }

    fn name(&self) -> &str {
        "silence"
    }
}
