use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::controller::PlaybackState;

/// Cycles through a fixed number of 1-based animation frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCycle {
    frame_count: u32,
}

impl Default for FrameCycle {
    fn default() -> Self {
        Self { frame_count: 47 }
    }
}

impl FrameCycle {
    pub fn new(frame_count: u32) -> Self {
        Self {
            frame_count: frame_count.max(1),
        }
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Frame to show on the next tick
    pub fn advance(&self, frame: u32, playing: bool) -> u32 {
        if playing {
            frame % self.frame_count + 1
        } else {
            frame
        }
    }
}

/// Drives a [`FrameCycle`] at a fixed rate while playback is active
pub struct AnimationTicker {
    frame_rx: watch::Receiver<u32>,
    task: JoinHandle<()>,
}

impl AnimationTicker {
    pub fn spawn(cycle: FrameCycle, fps: u32, playback: watch::Receiver<PlaybackState>) -> Self {
        let (frame_tx, frame_rx) = watch::channel(1u32);
        let period = Duration::from_secs_f64(1.0 / fps.max(1) as f64);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let playing = *playback.borrow() == PlaybackState::Playing;
                frame_tx.send_if_modified(|frame| {
                    let next = cycle.advance(*frame, playing);
                    let changed = next != *frame;
                    *frame = next;
                    changed
                });
            }
        });

        Self { frame_rx, task }
    }

    pub fn frame(&self) -> u32 {
        *self.frame_rx.borrow()
    }
}

impl Drop for AnimationTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
