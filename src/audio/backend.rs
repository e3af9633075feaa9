use anyhow::{bail, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::file::FileCaptureDevice;
use super::silence::SilenceCaptureDevice;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since the tap was installed
    pub timestamp_ms: u64,
}

impl AudioFrame {
    /// Number of sample frames (samples per channel)
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }
}

/// Configuration for a capture tap
#[derive(Debug, Clone)]
pub struct TapConfig {
    /// Frames per delivered buffer
    pub buffer_size: usize,
    /// Sample rate of delivered buffers
    pub sample_rate: u32,
    /// Channel count of delivered buffers
    pub channels: u16,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1024,
            sample_rate: 44100,
            channels: 1,
        }
    }
}

impl TapConfig {
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            bail!("Tap buffer size must be non-zero");
        }
        if self.sample_rate == 0 {
            bail!("Tap sample rate must be non-zero");
        }
        if self.channels == 0 {
            bail!("Tap channel count must be non-zero");
        }
        if self.buffer_period().is_zero() {
            bail!(
                "Tap buffer of {} frames at {} Hz is too short to schedule",
                self.buffer_size,
                self.sample_rate
            );
        }
        Ok(())
    }

    /// Delivery cadence of one buffer
    pub fn buffer_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.buffer_size as f64 / self.sample_rate as f64)
    }
}

/// Audio capture device trait
///
/// The device is owned by whoever installs the tap and is independent of
/// the playback service. Implementations use interior state so a shared
/// handle can run the permission request concurrently with tap management.
#[async_trait::async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Ask for permission to capture. Returns whether it was granted.
    async fn request_permission(&self) -> Result<bool>;

    /// Install a tap delivering fixed-size buffers.
    ///
    /// Returns a channel receiver that will receive audio frames
    async fn install_tap(&self, config: TapConfig) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Remove the tap. No buffers are delivered after this returns.
    async fn remove_tap(&self) -> Result<()>;

    /// Check if a tap is currently installed
    fn is_tapped(&self) -> bool;

    /// Get device name for logging
    fn name(&self) -> &str;
}

/// Capture device factory
pub struct CaptureDeviceFactory;

impl CaptureDeviceFactory {
    /// Create a capture device for the configured source
    pub fn create(source: CaptureSource) -> Result<Arc<dyn CaptureDevice>> {
        match source {
            CaptureSource::File { path, looping } => {
                Ok(Arc::new(FileCaptureDevice::new(path, looping)))
            }
            CaptureSource::Silence => Ok(Arc::new(SilenceCaptureDevice::new())),
        }
    }
}

/// Capture source type
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// Replay a WAV file in real time
    File { path: PathBuf, looping: bool },
    /// Zero-filled buffers at the tap cadence
    Silence,
}
