use std::net::SocketAddr;

/// Кто открыл соединение.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOrigin {
    /// Наше исходящее подключение к пиру удалось.
    Outbound,
    /// Исходящее не удалось, пир подключился к нашему слушающему сокету.
    Inbound,
}

/// События, которые транспорт отдает своему единственному слушателю.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Исходящее подключение не удалось, ждем входящее на этом адресе.
    Listening(SocketAddr),

    ConnectionEstablished {
        origin: ConnectionOrigin,
        peer: SocketAddr,
    },

    /// Одна строка входящих данных, без `\n`.
    MessageReceived(String),

    /// Соединение закрыто. Отправляется ровно один раз за время жизни транспорта.
    ConnectionClosed,

    /// Ошибка ввода-вывода или обе попытки соединиться провалились.
    /// За ней всегда следует `ConnectionClosed`.
    ConnectionError(String),
}
