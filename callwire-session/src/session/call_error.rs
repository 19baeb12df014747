use callwire_core::{AddressParseError, DecodeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallError {
    /// Malformed `host:port`; the call never starts.
    #[error("invalid peer address: {0}")]
    AddressParse(#[from] AddressParseError),

    /// Neither the outbound attempt nor the listen fallback produced a connection.
    #[error("could not connect to peer: {0}")]
    TransportConnect(String),

    /// The signaling connection failed after it was established.
    #[error("signaling connection failed: {0}")]
    Transport(String),

    /// One bad frame; logged and dropped.
    #[error("malformed signaling frame: {0}")]
    ProtocolDecode(#[from] DecodeError),

    /// A well-formed frame that is not valid in the current state; rejected.
    #[error("unexpected signaling message: {0}")]
    UnexpectedMessage(String),

    /// The media engine could not produce or apply a description.
    #[error("negotiation failed: {0}")]
    Negotiation(String),

    #[error("media connection failed")]
    MediaFailed,

    /// Remote side went away cleanly. Ends the call, not an error for the UI.
    #[error("peer disconnected")]
    PeerDisconnected,

    #[error("call already started")]
    AlreadyStarted,

    #[error("call session is closed")]
    SessionClosed,
}

impl CallError {
    pub(crate) fn negotiation(what: &str, err: anyhow::Error) -> Self {
        CallError::Negotiation(format!("{what}: {err:#}"))
    }
}
