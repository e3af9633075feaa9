use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of a recognized media item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recognized song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub identity: MatchId,
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl MediaItem {
    /// `"{title} by {artist}"` with placeholders for missing fields
    pub fn display_label(&self) -> String {
        format!(
            "{} by {}",
            self.title.as_deref().unwrap_or("Unknown title"),
            self.artist.as_deref().unwrap_or("Unknown artist")
        )
    }
}

/// Outcome of one recognition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Matched(MediaItem),
    NoMatch,
    SessionError { message: String },
}

impl MatchResult {
    pub fn matched(
        identity: impl Into<String>,
        title: Option<&str>,
        artist: Option<&str>,
    ) -> Self {
        MatchResult::Matched(MediaItem {
            identity: MatchId::new(identity),
            title: title.map(str::to_string),
            artist: artist.map(str::to_string),
        })
    }
}
