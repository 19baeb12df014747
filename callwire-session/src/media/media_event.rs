use callwire_core::IceCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

/// Удаленный поток (трек), о котором сообщил движок.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStream {
    pub stream_id: String,
    pub kind: MediaKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

impl ConnectivityState {
    /// States after which media can no longer flow on this connection.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            ConnectivityState::Disconnected | ConnectivityState::Failed | ConnectivityState::Closed
        )
    }
}

/// События, которые медиа-движок генерирует для сессии.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    /// Сгенерирован локальный ICE-кандидат, его нужно отправить пиру.
    LocalCandidate(IceCandidate),

    RemoteStreamAdded(RemoteStream),

    ConnectivityChanged(ConnectivityState),
}
