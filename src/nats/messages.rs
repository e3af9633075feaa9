use serde::{Deserialize, Serialize};

use crate::recognition::{MatchResult, MediaItem, MatchId};

/// Audio frame message published to NATS
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioFrameMessage {
    pub session_id: String,
    pub sequence: u32,
    pub pcm: String,  // Base64-encoded PCM bytes
    pub sample_rate: u32,
    pub channels: u16,
    pub timestamp: String,  // RFC3339 timestamp
    #[serde(rename = "final")]
    pub final_frame: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    NoMatch,
    Error,
}

/// One candidate in a match result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedItemMessage {
    pub media_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
}

/// Recognition result received from the fingerprinting service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMessage {
    pub session_id: String,
    pub status: MatchStatus,
    #[serde(default)]
    pub items: Vec<MatchedItemMessage>,
    #[serde(default)]
    pub error: Option<String>,
    pub timestamp: String,
}

impl MatchMessage {
    /// Translate into a [`MatchResult`]
    ///
    /// Only the first candidate of a match is used; a match without
    /// candidates yields `None`. A `no_match` carrying an error is still a
    /// plain `NoMatch`.
    pub fn into_result(self) -> Option<MatchResult> {
        match self.status {
            MatchStatus::Matched => {
                let item = self.items.into_iter().next()?;
                Some(MatchResult::Matched(MediaItem {
                    identity: MatchId::new(item.media_id),
                    title: item.title,
                    artist: item.artist,
                }))
            }
            MatchStatus::NoMatch => Some(MatchResult::NoMatch),
            MatchStatus::Error => Some(MatchResult::SessionError {
                message: self
                    .error
                    .unwrap_or_else(|| "unspecified recognition error".to_string()),
            }),
        }
    }
}
