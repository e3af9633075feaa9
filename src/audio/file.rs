use anyhow::{Context, Result};
use hound::WavReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::backend::{AudioFrame, CaptureDevice, TapConfig};
use super::tap::TapSlot;

pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path)
            .context("Failed to open WAV file")?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let duration_seconds = samples.len() as f64 /
            (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }
}

/// Capture device that replays a WAV file in real time
///
/// Buffers keep the file's own sample rate and channel layout; only the
/// tap's buffer size is honoured.
pub struct FileCaptureDevice {
    path: PathBuf,
    looping: bool,
    tap: TapSlot,
}

impl FileCaptureDevice {
    pub fn new(path: impl Into<PathBuf>, looping: bool) -> Self {
        Self {
            path: path.into(),
            looping,
            tap: TapSlot::new(),
        }
    }
}

#[async_trait::async_trait]
impl CaptureDevice for FileCaptureDevice {
    async fn request_permission(&self) -> Result<bool> {
        match tokio::fs::File::open(&self.path).await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!("Capture file {} is not readable: {}", self.path.display(), e);
                Ok(false)
            }
        }
    }

    async fn install_tap(&self, config: TapConfig) -> Result<mpsc::Receiver<AudioFrame>> {
        config.validate()?;

        let path = self.path.clone();
        let audio = tokio::task::spawn_blocking(move || AudioFile::open(path))
            .await
            .context("Audio file loader panicked")??;

        let file_config = TapConfig {
            buffer_size: config.buffer_size,
            sample_rate: audio.sample_rate,
            channels: audio.channels,
        };
        file_config.validate().context("Unsupported WAV layout")?;

        let (tx, rx) = mpsc::channel(100);
        let samples = Arc::new(audio.samples);
        let looping = self.looping;

        info!(
            "Installing file tap on {} ({} frames per buffer, every {:?})",
            self.path.display(),
            file_config.buffer_size,
            file_config.buffer_period()
        );

        self.tap
            .install(replay(samples, file_config, looping, tx))?;

        Ok(rx)
    }

    async fn remove_tap(&self) -> Result<()> {
        self.tap.remove().await;
        info!("File tap removed");
        Ok(())
    }

    fn is_tapped(&self) -> bool {
        self.tap.is_active()
    }

    fn name(&self) -> &str {
        "WAV file"
    }
}

async fn replay(
    samples: Arc<Vec<i16>>,
    config: TapConfig,
    looping: bool,
    tx: mpsc::Sender<AudioFrame>,
) {
    let channels = config.channels as usize;
    let chunk_len = config.buffer_size * channels;
    let mut ticker = tokio::time::interval(config.buffer_period());
    let mut position = 0usize;
    let mut frames_delivered = 0u64;

    loop {
        ticker.tick().await;

        if position >= samples.len() {
            if looping && !samples.is_empty() {
                position = 0;
            } else {
                info!("Capture file exhausted after {} frames", frames_delivered);
                break;
            }
        }

        let end = (position + chunk_len).min(samples.len());
        let frame = AudioFrame {
            samples: samples[position..end].to_vec(),
            sample_rate: config.sample_rate,
            channels: config.channels,
            timestamp_ms: frames_delivered * 1000 / config.sample_rate as u64,
        };

        frames_delivered += ((end - position) / channels) as u64;
        position = end;

        if tx.send(frame).await.is_err() {
            break;
        }
    }
}
