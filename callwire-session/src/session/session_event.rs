use crate::media::MediaEvent;
use crate::session::CallCommand;
use crate::transport::TransportEvent;

/// Все, что может изменить состояние сессии. Все источники пишут в одну
/// очередь, которую разбирает одна задача.
#[derive(Debug)]
pub enum SessionEvent {
    Command(CallCommand),
    Transport(TransportEvent),
    Media(MediaEvent),
}

impl From<CallCommand> for SessionEvent {
    fn from(command: CallCommand) -> Self {
        SessionEvent::Command(command)
    }
}

impl From<TransportEvent> for SessionEvent {
    fn from(event: TransportEvent) -> Self {
        SessionEvent::Transport(event)
    }
}

impl From<MediaEvent> for SessionEvent {
    fn from(event: MediaEvent) -> Self {
        SessionEvent::Media(event)
    }
}
