use anyhow::{bail, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::audio::{CaptureSource, TapConfig};
use crate::controller::ControllerOptions;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub stream: StreamConfig,
    pub capture: CaptureConfig,
    pub recognition: RecognitionConfig,
    pub animation: AnimationConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct StreamConfig {
    pub url: String,
    pub player: String,
    pub player_args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureKind {
    File,
    Silence,
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    pub source: CaptureKind,
    pub path: Option<String>,
    pub looping: bool,
    pub buffer_size: usize,
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Deserialize)]
pub struct RecognitionConfig {
    pub nats_url: String,
    pub subject_prefix: String,
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Deserialize)]
pub struct AnimationConfig {
    pub frame_count: u32,
    pub fps: u32,
}

impl Config {
    /// Load configuration
    ///
    /// Built-in defaults, then the file at `path` if present, then
    /// `STREAMO__SECTION__KEY` environment variables.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Self::defaults()?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("STREAMO").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(config::Config::builder()
            .set_default("service.name", "streamo")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 8088)?
            .set_default("stream.url", "http://localhost:8000/radio.mp3")?
            .set_default("stream.player", "mpv")?
            .set_default(
                "stream.player_args",
                vec!["--no-video".to_string(), "--really-quiet".to_string()],
            )?
            .set_default("capture.source", "silence")?
            .set_default("capture.looping", true)?
            .set_default("capture.buffer_size", 1024)?
            .set_default("capture.sample_rate", 44100)?
            .set_default("capture.channels", 1)?
            .set_default("recognition.nats_url", "nats://localhost:4222")?
            .set_default("recognition.subject_prefix", "recognition")?
            .set_default("recognition.sample_rate", 16000)?
            .set_default("recognition.channels", 1)?
            .set_default("animation.frame_count", 47)?
            .set_default("animation.fps", 24)?)
    }

    pub fn capture_source(&self) -> Result<CaptureSource> {
        match self.capture.source {
            CaptureKind::Silence => Ok(CaptureSource::Silence),
            CaptureKind::File => {
                let Some(path) = self.capture.path.as_deref() else {
                    bail!("capture.path is required when capture.source = \"file\"");
                };
                Ok(CaptureSource::File {
                    path: PathBuf::from(shellexpand::tilde(path).into_owned()),
                    looping: self.capture.looping,
                })
            }
        }
    }

    pub fn tap_config(&self) -> TapConfig {
        TapConfig {
            buffer_size: self.capture.buffer_size,
            sample_rate: self.capture.sample_rate,
            channels: self.capture.channels,
        }
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            stream_url: self.stream.url.clone(),
            tap: self.tap_config(),
        }
    }
}
