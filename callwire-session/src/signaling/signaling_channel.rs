use crate::session::CallError;
use crate::transport::{SignalingTransport, TransportError};
use callwire_core::{PeerAddress, SignalingCommand, decode, encode};
use tracing::{debug, error, warn};

/// Кодек поверх транспорта: сессия работает с командами, транспорт со строками.
pub(crate) struct SignalingChannel {
    transport: SignalingTransport,
}

impl SignalingChannel {
    pub fn new(transport: SignalingTransport) -> Self {
        Self { transport }
    }

    pub fn connect(&self, address: &PeerAddress) -> Result<(), TransportError> {
        self.transport.connect(address)
    }

    /// Отправка без ожидания: ошибки транспорта только логируются, о разрыве
    /// сессия узнает из событий транспорта.
    pub fn send_command(&self, command: &SignalingCommand) {
        let frame = encode(command);
        debug!("Sending {} ({} bytes)", command.kind, frame.len());
        match self.transport.send(frame) {
            Ok(()) => {}
            Err(TransportError::Closed) => {
                warn!("Dropping {} command: signaling transport is closed", command.kind)
            }
            Err(e) => error!("Failed to send {} command: {}", command.kind, e),
        }
    }

    pub fn decode_frame(&self, frame: &str) -> Result<SignalingCommand, CallError> {
        Ok(decode(frame)?)
    }

    pub fn close(&self) {
        self.transport.disconnect();
    }
}
