use crate::model::ice::IceCandidate;
use crate::model::sdp::{SdpKind, SessionDescription};
use std::fmt;

/// Kind tag of a signaling frame (`type` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Offer,
    Answer,
    Candidate,
    /// A tag this build does not understand. Kept verbatim so the caller
    /// can decide whether to ignore it.
    Unknown(String),
}

impl CommandKind {
    pub fn as_str(&self) -> &str {
        match self {
            CommandKind::Offer => "offer",
            CommandKind::Answer => "answer",
            CommandKind::Candidate => "candidate",
            CommandKind::Unknown(other) => other,
        }
    }

    pub fn from_wire(tag: &str) -> Self {
        match tag {
            "offer" => CommandKind::Offer,
            "answer" => CommandKind::Answer,
            "candidate" => CommandKind::Candidate,
            other => CommandKind::Unknown(other.to_owned()),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SdpKind> for CommandKind {
    fn from(kind: SdpKind) -> Self {
        match kind {
            SdpKind::Offer => CommandKind::Offer,
            SdpKind::Answer => CommandKind::Answer,
        }
    }
}

/// One signaling frame exchanged between the two peers.
///
/// Only the fields relevant to `kind` are populated: `sdp` for offers and
/// answers, the `candidate_*` fields for candidates. Unknown kinds keep
/// whatever fields the remote sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalingCommand {
    pub kind: CommandKind,
    pub sdp: Option<String>,
    pub candidate_mid: Option<String>,
    pub candidate_media_line_index: Option<u16>,
    pub candidate_data: Option<String>,
}

impl SignalingCommand {
    fn bare(kind: CommandKind) -> Self {
        Self {
            kind,
            sdp: None,
            candidate_mid: None,
            candidate_media_line_index: None,
            candidate_data: None,
        }
    }

    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            sdp: Some(sdp.into()),
            ..Self::bare(CommandKind::Offer)
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            sdp: Some(sdp.into()),
            ..Self::bare(CommandKind::Answer)
        }
    }

    pub fn candidate(candidate: IceCandidate) -> Self {
        Self {
            candidate_mid: candidate.sdp_mid,
            candidate_media_line_index: candidate.sdp_m_line_index,
            candidate_data: Some(candidate.candidate),
            ..Self::bare(CommandKind::Candidate)
        }
    }

    pub fn unknown(tag: impl Into<String>) -> Self {
        Self::bare(CommandKind::Unknown(tag.into()))
    }

    /// The session description carried by an offer or answer.
    pub fn session_description(&self) -> Option<SessionDescription> {
        let kind = match self.kind {
            CommandKind::Offer => SdpKind::Offer,
            CommandKind::Answer => SdpKind::Answer,
            _ => return None,
        };
        let sdp = self.sdp.clone()?;
        Some(SessionDescription { kind, sdp })
    }

    /// The ICE candidate carried by a candidate frame.
    pub fn ice_candidate(&self) -> Option<IceCandidate> {
        if self.kind != CommandKind::Candidate {
            return None;
        }
        let candidate = self.candidate_data.clone()?;
        Some(IceCandidate {
            candidate,
            sdp_mid: self.candidate_mid.clone(),
            sdp_m_line_index: self.candidate_media_line_index,
        })
    }
}

impl From<SessionDescription> for SignalingCommand {
    fn from(desc: SessionDescription) -> Self {
        Self {
            sdp: Some(desc.sdp),
            ..Self::bare(desc.kind.into())
        }
    }
}

impl From<IceCandidate> for SignalingCommand {
    fn from(candidate: IceCandidate) -> Self {
        Self::candidate(candidate)
    }
}
