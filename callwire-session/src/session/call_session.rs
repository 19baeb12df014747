use crate::EventSink;
use crate::media::MediaEngine;
use crate::session::call_loop::CallLoop;
use crate::session::{
    CallCommand, CallError, CallObserver, CallSnapshot, CallState, SessionConfig, SessionEvent,
};
use crate::signaling::SignalingChannel;
use crate::transport::SignalingTransport;
use callwire_core::{CallMode, ConnectionRole, PeerAddress, SessionId};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, watch};
use tracing::{Instrument, info, info_span};

/// Handle to one call. The call itself runs in a background task that owns the
/// transport and the media engine; this handle only enqueues commands.
///
/// Dropping the handle ends the call.
pub struct CallSession {
    id: SessionId,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    snapshot_rx: watch::Receiver<CallSnapshot>,
    started: AtomicBool,
}

impl CallSession {
    /// Spawns an idle session. Must be called inside a tokio runtime.
    pub fn new<M: MediaEngine>(
        config: SessionConfig,
        mut media: M,
        observer: Arc<dyn CallObserver>,
    ) -> Self {
        let id = SessionId::new();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(CallSnapshot::default());

        media.set_event_sink(EventSink::channel(event_tx.clone()));
        let transport =
            SignalingTransport::new(config.transport, EventSink::channel(event_tx.clone()));

        let call_loop = CallLoop::new(
            Box::new(media),
            SignalingChannel::new(transport),
            observer,
            event_rx,
            snapshot_tx,
        );

        info!(session = %id, "Creating call session");
        tokio::spawn(call_loop.run().instrument(info_span!("call", session = %id)));

        Self {
            id,
            event_tx,
            snapshot_rx,
            started: AtomicBool::new(false),
        }
    }

    /// Validates `address` before anything is spawned, then starts the call.
    pub fn start<M: MediaEngine>(
        address: &str,
        mode: CallMode,
        config: SessionConfig,
        media: M,
        observer: Arc<dyn CallObserver>,
    ) -> Result<Self, CallError> {
        let address: PeerAddress = address.parse()?;
        let session = Self::new(config, media, observer);
        session.start_with(address, mode)?;
        Ok(session)
    }

    /// Начать звонок на `host:port`. Ошибка разбора адреса возвращается сразу,
    /// все остальные приходят через `CallObserver`.
    pub fn start_call(&self, address: &str, mode: CallMode) -> Result<(), CallError> {
        let address: PeerAddress = address.parse()?;
        self.start_with(address, mode)
    }

    fn start_with(&self, address: PeerAddress, mode: CallMode) -> Result<(), CallError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(CallError::AlreadyStarted);
        }
        self.command(CallCommand::Start { address, mode })
    }

    /// Идемпотентно. После завершения звонка ничего не делает.
    pub fn end_call(&self) {
        let _ = self.command(CallCommand::End);
    }

    pub fn mute(&self) {
        let _ = self.command(CallCommand::Mute);
    }

    pub fn unmute(&self) {
        let _ = self.command(CallCommand::Unmute);
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn snapshot(&self) -> CallSnapshot {
        *self.snapshot_rx.borrow()
    }

    pub fn state(&self) -> CallState {
        self.snapshot().state
    }

    pub fn role(&self) -> Option<ConnectionRole> {
        self.snapshot().role
    }

    pub fn is_muted(&self) -> bool {
        self.snapshot().muted
    }

    /// Receiver that sees every published snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<CallSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Waits until the call reaches `Ended` or `Failed` and returns that state.
    pub async fn finished(&self) -> CallState {
        let mut rx = self.snapshot_rx.clone();
        let reached = rx
            .wait_for(|s| s.state.is_terminal())
            .await
            .map(|s| s.state);
        // The loop publishes its terminal state before it drops the sender.
        reached.unwrap_or_else(|_| self.snapshot_rx.borrow().state)
    }

    fn command(&self, command: CallCommand) -> Result<(), CallError> {
        self.event_tx
            .send(SessionEvent::Command(command))
            .map_err(|_| CallError::SessionClosed)
    }
}

impl Drop for CallSession {
    fn drop(&mut self) {
        let _ = self.event_tx.send(SessionEvent::Command(CallCommand::End));
    }
}
