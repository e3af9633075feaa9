use anyhow::{bail, Context, Result};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{info, warn};

use super::service::{PlaybackService, PlaybackStatus};

/// Plays a stream by handing its URL to an external player process
///
/// The URL is appended after the configured arguments, e.g.
/// `mpv --no-video --really-quiet <url>`.
pub struct CommandPlayback {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
    last_exit: Option<Option<i32>>,
}

impl CommandPlayback {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: None,
            last_exit: None,
        }
    }
}

#[async_trait::async_trait]
impl PlaybackService for CommandPlayback {
    async fn play(&mut self, url: &str) -> Result<()> {
        if let Some(child) = self.child.as_mut() {
            if child.try_wait()?.is_none() {
                bail!("Player process is already running");
            }
        }

        info!("Launching {} for {}", self.program, url);

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to launch player `{}`", self.program))?;

        self.child = Some(child);
        self.last_exit = None;

        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        if child.try_wait()?.is_none() {
            info!("Stopping player process");
            if let Err(e) = child.kill().await {
                warn!("Failed to kill player process: {}", e);
            }
        }

        self.last_exit = None;
        Ok(())
    }

    async fn status(&mut self) -> PlaybackStatus {
        if let Some(code) = self.last_exit {
            return PlaybackStatus::Exited { code };
        }

        let Some(child) = self.child.as_mut() else {
            return PlaybackStatus::Idle;
        };

        match child.try_wait() {
            Ok(None) => PlaybackStatus::Playing,
            Ok(Some(exit)) => {
                self.child = None;
                self.last_exit = Some(exit.code());
                PlaybackStatus::Exited { code: exit.code() }
            }
            Err(e) => {
                warn!("Failed to poll player process: {}", e);
                PlaybackStatus::Idle
            }
        }
    }

    fn name(&self) -> &str {
        &self.program
    }
}
