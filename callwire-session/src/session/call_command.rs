use callwire_core::{CallMode, PeerAddress};

/// Команды, поступающие в сессию от UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallCommand {
    /// Начать звонок: подключиться к пиру и подготовить локальные медиа.
    Start { address: PeerAddress, mode: CallMode },

    /// Выключить микрофон.
    Mute,

    /// Включить микрофон.
    Unmute,

    /// Завершить звонок и освободить транспорт и медиа-движок.
    End,
}
