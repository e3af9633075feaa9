use serde::Serialize;

use crate::recognition::{MatchResult, MediaItem};

/// Label shown while no song is recognized
pub const UNKNOWN_SONG: &str = "Unknown song";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    #[default]
    Unknown,
    Pending,
    Granted,
    Denied,
}

/// The currently accepted match and the label derived from it
#[derive(Debug, Clone, Default)]
pub struct NowPlaying {
    current: Option<MediaItem>,
}

impl NowPlaying {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&MediaItem> {
        self.current.as_ref()
    }

    pub fn label(&self) -> String {
        match &self.current {
            Some(item) => item.display_label(),
            None => UNKNOWN_SONG.to_string(),
        }
    }

    /// Apply a recognition result. Returns whether the label changed.
    ///
    /// Repeated matches of the shown identity are ignored, and `NoMatch`
    /// only clears a match that is currently shown. Session errors never
    /// touch the current match.
    pub fn apply(&mut self, result: &MatchResult) -> bool {
        match result {
            MatchResult::Matched(item) => {
                if self
                    .current
                    .as_ref()
                    .is_some_and(|current| current.identity == item.identity)
                {
                    return false;
                }
                self.current = Some(item.clone());
                true
            }
            MatchResult::NoMatch => self.current.take().is_some(),
            MatchResult::SessionError { .. } => false,
        }
    }
}
