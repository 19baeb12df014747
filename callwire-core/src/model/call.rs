use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallMode {
    /// Audio track only; the video track is never created.
    AudioOnly,
    AudioVideo,
}

impl CallMode {
    pub fn has_video(self) -> bool {
        matches!(self, CallMode::AudioVideo)
    }
}

impl fmt::Display for CallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallMode::AudioOnly => f.write_str("audio-only"),
            CallMode::AudioVideo => f.write_str("audio+video"),
        }
    }
}

/// Which side sent the first offer. Assigned once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionRole {
    Initiator,
    Answerer,
}

impl fmt::Display for ConnectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionRole::Initiator => f.write_str("initiator"),
            ConnectionRole::Answerer => f.write_str("answerer"),
        }
    }
}
