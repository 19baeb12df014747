use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Лимит очереди исходящих сообщений.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueLimit {
    /// Очередь растет без ограничений (зависший пир = рост памяти).
    #[default]
    Unbounded,
    /// При переполнении `send` возвращает `TransportError::QueueFull`.
    Bounded(usize),
}

/// Конфигурация сигнального транспорта.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Сколько ждать исходящего соединения, прежде чем перейти к прослушиванию порта.
    pub connect_timeout: Duration,
    /// Адрес, на котором слушаем при fallback-е (порт берется из адреса пира).
    pub listen_host: IpAddr,
    pub outgoing_queue: QueueLimit,
    /// Максимальная длина одного входящего кадра без учета `\n`.
    pub max_frame_bytes: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(3),
            listen_host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            outgoing_queue: QueueLimit::Unbounded,
            max_frame_bytes: 1024 * 1024,
        }
    }
}
