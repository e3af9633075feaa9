use anyhow::{bail, Result};
use std::future::Future;
use std::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Holds the producer task behind an installed tap.
///
/// At most one producer runs per slot. The producer owns the channel sender,
/// so aborting it closes the receiving side.
#[derive(Default)]
pub struct TapSlot {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl TapSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install<F>(&self, producer: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut task = match self.task.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            bail!("A tap is already installed");
        }

        *task = Some(tokio::spawn(producer));
        Ok(())
    }

    /// Abort the producer and wait until it is gone.
    pub async fn remove(&self) {
        let handle = match self.task.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        let Some(handle) = handle else {
            return;
        };

        handle.abort();
        match handle.await {
            Ok(()) => debug!("Tap producer had already finished"),
            Err(e) if e.is_cancelled() => debug!("Tap producer cancelled"),
            Err(e) => error!("Tap producer panicked: {}", e),
        }
    }

    pub fn is_active(&self) -> bool {
        match self.task.lock() {
            Ok(guard) => guard.as_ref().is_some_and(|t| !t.is_finished()),
            Err(poisoned) => poisoned.into_inner().as_ref().is_some_and(|t| !t.is_finished()),
        }
    }
}
