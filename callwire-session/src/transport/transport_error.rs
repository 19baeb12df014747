use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transport already started connecting")]
    AlreadyStarted,

    #[error("transport is closed")]
    Closed,

    #[error("outgoing queue is full ({0} frames)")]
    QueueFull(usize),

    #[error("frame contains a line terminator")]
    EmbeddedNewline,
}
