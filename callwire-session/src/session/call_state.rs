use callwire_core::ConnectionRole;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationPhase {
    /// Мы отправили offer и ждем answer.
    Offering,
    /// Мы получили offer и готовим answer.
    Answering,
}

/// Состояние сессии. `Ended` и `Failed` терминальные: для нового звонка
/// нужна новая сессия.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Connecting,
    RoleUndetermined,
    Negotiating(NegotiationPhase),
    Established,
    Ended,
    Failed,
}

impl CallState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CallState::Ended | CallState::Failed)
    }

    /// Started and not yet finished.
    pub fn is_active(self) -> bool {
        !matches!(self, CallState::Idle) && !self.is_terminal()
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallState::Idle => f.write_str("idle"),
            CallState::Connecting => f.write_str("connecting"),
            CallState::RoleUndetermined => f.write_str("role-undetermined"),
            CallState::Negotiating(NegotiationPhase::Offering) => f.write_str("negotiating/offering"),
            CallState::Negotiating(NegotiationPhase::Answering) => {
                f.write_str("negotiating/answering")
            }
            CallState::Established => f.write_str("established"),
            CallState::Ended => f.write_str("ended"),
            CallState::Failed => f.write_str("failed"),
        }
    }
}

/// То, что UI может наблюдать через `CallSession::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSnapshot {
    pub state: CallState,
    pub role: Option<ConnectionRole>,
    pub muted: bool,
}

impl Default for CallSnapshot {
    fn default() -> Self {
        Self {
            state: CallState::Idle,
            role: None,
            muted: false,
        }
    }
}
