use crate::media::{ConnectivityState, MediaEngine, MediaEvent};
use crate::session::{
    CallCommand, CallError, CallObserver, CallSnapshot, CallState, NegotiationPhase, SessionEvent,
};
use crate::signaling::SignalingChannel;
use crate::transport::{ConnectionOrigin, TransportEvent};
use callwire_core::{
    CallMode, CommandKind, ConnectionRole, IceCandidate, PeerAddress, SessionDescription,
    SignalingCommand,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Единственный владелец состояния звонка. Все события (команды UI, события
/// транспорта и медиа-движка) разбираются здесь по одному.
///
/// Offer всегда отправляет сторона, чье исходящее подключение удалось;
/// принявшая соединение сторона только отвечает.
pub(crate) struct CallLoop {
    media: Box<dyn MediaEngine>,
    signaling: SignalingChannel,
    observer: Arc<dyn CallObserver>,
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,
    snapshot_tx: watch::Sender<CallSnapshot>,
    state: CallState,
    role: Option<ConnectionRole>,
    remote_description_applied: bool,
    pending_candidates: VecDeque<IceCandidate>,
}

impl CallLoop {
    pub fn new(
        media: Box<dyn MediaEngine>,
        signaling: SignalingChannel,
        observer: Arc<dyn CallObserver>,
        event_rx: mpsc::UnboundedReceiver<SessionEvent>,
        snapshot_tx: watch::Sender<CallSnapshot>,
    ) -> Self {
        Self {
            media,
            signaling,
            observer,
            event_rx,
            snapshot_tx,
            state: CallState::Idle,
            role: None,
            remote_description_applied: false,
            pending_candidates: VecDeque::new(),
        }
    }

    pub async fn run(mut self) {
        info!("Call event loop started");

        while let Some(event) = self.event_rx.recv().await {
            self.dispatch(event).await;
            if self.state.is_terminal() {
                break;
            }
        }

        self.signaling.close();
        self.media.dispose().await;

        info!("Call event loop finished ({})", self.state);
    }

    async fn dispatch(&mut self, event: SessionEvent) {
        match self.handle_event(event).await {
            Ok(()) => {}
            Err(e @ (CallError::ProtocolDecode(_) | CallError::UnexpectedMessage(_))) => {
                warn!("Dropping signaling frame: {}", e);
            }
            Err(CallError::PeerDisconnected) => {
                info!("Peer disconnected");
                self.finish_ended().await;
            }
            Err(e) => {
                error!("Call failed: {}", e);
                self.finish_failed(e).await;
            }
        }
    }

    async fn handle_event(&mut self, event: SessionEvent) -> Result<(), CallError> {
        match event {
            SessionEvent::Command(cmd) => self.handle_command(cmd).await,
            SessionEvent::Transport(evt) => self.handle_transport_event(evt).await,
            SessionEvent::Media(evt) => self.handle_media_event(evt).await,
        }
    }

    async fn handle_command(&mut self, cmd: CallCommand) -> Result<(), CallError> {
        match cmd {
            CallCommand::Start { address, mode } => self.start(address, mode).await,

            CallCommand::Mute => {
                self.media.mute();
                self.snapshot_tx.send_modify(|s| s.muted = true);
                Ok(())
            }

            CallCommand::Unmute => {
                self.media.unmute();
                self.snapshot_tx.send_modify(|s| s.muted = false);
                Ok(())
            }

            CallCommand::End => {
                info!("Call ended locally");
                self.finish_ended().await;
                Ok(())
            }
        }
    }

    async fn start(&mut self, address: PeerAddress, mode: CallMode) -> Result<(), CallError> {
        if self.state != CallState::Idle {
            warn!("Ignoring start request in state {}", self.state);
            return Ok(());
        }

        info!("Starting {} call with {}", mode, address);
        self.signaling
            .connect(&address)
            .map_err(|e| CallError::TransportConnect(e.to_string()))?;
        self.set_state(CallState::Connecting);

        self.media
            .prepare_local_media(mode)
            .await
            .map_err(|e| CallError::negotiation("failed to prepare local media", e))
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) -> Result<(), CallError> {
        match event {
            TransportEvent::Listening(local_addr) => {
                info!("Waiting for peer on {}", local_addr);
                self.observer.on_waiting_for_peer(local_addr).await;
                Ok(())
            }

            TransportEvent::ConnectionEstablished { origin, peer } => {
                if self.state != CallState::Connecting {
                    warn!("Unexpected connection to {} in state {}", peer, self.state);
                    return Ok(());
                }
                info!("Signaling connected to {} ({:?})", peer, origin);
                self.set_state(CallState::RoleUndetermined);

                match origin {
                    ConnectionOrigin::Outbound => self.send_offer().await,
                    ConnectionOrigin::Inbound => {
                        debug!("Waiting for the peer's offer");
                        Ok(())
                    }
                }
            }

            TransportEvent::MessageReceived(frame) => {
                let command = self.signaling.decode_frame(&frame)?;
                self.handle_signal(command).await
            }

            TransportEvent::ConnectionClosed => Err(CallError::PeerDisconnected),

            TransportEvent::ConnectionError(reason) => {
                if self.state == CallState::Connecting {
                    Err(CallError::TransportConnect(reason))
                } else {
                    Err(CallError::Transport(reason))
                }
            }
        }
    }

    async fn handle_media_event(&mut self, event: MediaEvent) -> Result<(), CallError> {
        match event {
            MediaEvent::LocalCandidate(candidate) => {
                if !self.state.is_active() {
                    debug!("Dropping local candidate in state {}", self.state);
                    return Ok(());
                }
                self.signaling
                    .send_command(&SignalingCommand::candidate(candidate));
                Ok(())
            }

            MediaEvent::RemoteStreamAdded(stream) => {
                info!("Remote {:?} stream added: {}", stream.kind, stream.stream_id);
                self.observer.on_remote_stream_added(stream).await;
                Ok(())
            }

            MediaEvent::ConnectivityChanged(connectivity) => {
                debug!("Media connectivity: {:?}", connectivity);
                if !connectivity.is_fatal() {
                    return Ok(());
                }
                match connectivity {
                    ConnectivityState::Failed => Err(CallError::MediaFailed),
                    _ => Err(CallError::PeerDisconnected),
                }
            }
        }
    }

    async fn handle_signal(&mut self, command: SignalingCommand) -> Result<(), CallError> {
        debug!("Received {} command", command.kind);

        match &command.kind {
            CommandKind::Offer => self.handle_remote_offer(&command).await,
            CommandKind::Answer => self.handle_remote_answer(&command).await,
            CommandKind::Candidate => {
                let Some(candidate) = command.ice_candidate() else {
                    return Err(CallError::UnexpectedMessage(
                        "candidate command without candidate data".into(),
                    ));
                };
                self.handle_remote_candidate(candidate).await;
                Ok(())
            }
            CommandKind::Unknown(tag) => {
                warn!("Ignoring unknown signaling command `{}`", tag);
                Ok(())
            }
        }
    }

    async fn handle_remote_offer(&mut self, command: &SignalingCommand) -> Result<(), CallError> {
        if self.state != CallState::RoleUndetermined || self.role.is_some() {
            return Err(CallError::UnexpectedMessage(format!(
                "offer in state {} with role {:?}",
                self.state, self.role
            )));
        }
        let offer = remote_description(command)?;

        self.assign_role(ConnectionRole::Answerer);
        self.set_state(CallState::Negotiating(NegotiationPhase::Answering));

        self.media
            .apply_remote_description(offer)
            .await
            .map_err(|e| CallError::negotiation("failed to apply remote offer", e))?;
        self.remote_description_applied = true;
        self.flush_pending_candidates().await;

        let answer = self
            .media
            .create_answer()
            .await
            .map_err(|e| CallError::negotiation("failed to create answer", e))?;
        self.media
            .apply_local_description(answer.clone())
            .await
            .map_err(|e| CallError::negotiation("failed to apply local answer", e))?;

        self.signaling.send_command(&answer.into());
        self.set_state(CallState::Established);
        Ok(())
    }

    async fn handle_remote_answer(&mut self, command: &SignalingCommand) -> Result<(), CallError> {
        if self.state != CallState::Negotiating(NegotiationPhase::Offering) {
            return Err(CallError::UnexpectedMessage(format!(
                "answer in state {}",
                self.state
            )));
        }
        let answer = remote_description(command)?;

        self.media
            .apply_remote_description(answer)
            .await
            .map_err(|e| CallError::negotiation("failed to apply remote answer", e))?;
        self.remote_description_applied = true;
        self.flush_pending_candidates().await;

        self.set_state(CallState::Established);
        Ok(())
    }

    async fn handle_remote_candidate(&mut self, candidate: IceCandidate) {
        if !self.remote_description_applied {
            debug!(
                "Buffering remote candidate until remote description is applied ({} pending)",
                self.pending_candidates.len() + 1
            );
            self.pending_candidates.push_back(candidate);
            return;
        }
        self.add_remote_candidate(candidate).await;
    }

    async fn flush_pending_candidates(&mut self) {
        while let Some(candidate) = self.pending_candidates.pop_front() {
            self.add_remote_candidate(candidate).await;
        }
    }

    async fn add_remote_candidate(&mut self, candidate: IceCandidate) {
        let Err(e) = self.media.add_remote_candidate(candidate).await else {
            return;
        };
        warn!("Failed to add remote ICE candidate: {:#}", e);
    }

    async fn send_offer(&mut self) -> Result<(), CallError> {
        if self.state != CallState::RoleUndetermined {
            return Ok(());
        }

        self.assign_role(ConnectionRole::Initiator);
        self.set_state(CallState::Negotiating(NegotiationPhase::Offering));

        let offer = self
            .media
            .create_offer()
            .await
            .map_err(|e| CallError::negotiation("failed to create offer", e))?;
        self.media
            .apply_local_description(offer.clone())
            .await
            .map_err(|e| CallError::negotiation("failed to apply local offer", e))?;

        self.signaling.send_command(&offer.into());
        Ok(())
    }

    fn assign_role(&mut self, role: ConnectionRole) {
        if self.role.is_some() {
            return;
        }
        info!("Connection role: {}", role);
        self.role = Some(role);
        self.snapshot_tx.send_modify(|s| s.role = Some(role));
    }

    fn set_state(&mut self, state: CallState) {
        if self.state == state {
            return;
        }
        info!("Call state: {} -> {}", self.state, state);
        self.state = state;
        self.snapshot_tx.send_modify(|s| s.state = state);
    }

    async fn finish_ended(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.set_state(CallState::Ended);
        self.observer.on_call_ended().await;
    }

    async fn finish_failed(&mut self, error: CallError) {
        if self.state.is_terminal() {
            return;
        }
        self.set_state(CallState::Failed);
        self.observer.on_connection_error(error.to_string()).await;
    }
}

fn remote_description(command: &SignalingCommand) -> Result<SessionDescription, CallError> {
    command.session_description().ok_or_else(|| {
        CallError::UnexpectedMessage(format!("{} command without sdp", command.kind))
    })
}
