use crate::media::RemoteStream;
use async_trait::async_trait;
use std::net::SocketAddr;

/// Трейт, который реализует UI, чтобы получать события звонка.
///
/// Из колбэков `on_call_ended` и `on_connection_error` за сессию вызывается
/// ровно один.
#[async_trait]
pub trait CallObserver: Send + Sync + 'static {
    /// Медиа-движок получил удаленный трек.
    async fn on_remote_stream_added(&self, stream: RemoteStream);

    /// Звонок завершен (локально, пиром или потерей связи).
    async fn on_call_ended(&self);

    /// Звонок провалился. `reason` пригоден для показа пользователю.
    async fn on_connection_error(&self, reason: String);

    /// Исходящее подключение не удалось, ждем пира на этом адресе.
    async fn on_waiting_for_peer(&self, _local_addr: SocketAddr) {}
}
