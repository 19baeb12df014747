use crate::EventSink;
use crate::media::{
    ConnectivityState, MediaConfig, MediaEngine, MediaEvent, MediaKind, RemoteStream,
};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use callwire_core::{CallMode, IceCandidate, SdpKind, SessionDescription};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8, MediaEngine as RtcMediaEngine};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::media::Sample;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecCapability, RTPCodecType};
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

const STREAM_ID: &str = "callwire";

/// Медиа-движок на основе webrtc-rs.
///
/// Захват устройств здесь не реализован: приложение само пишет закодированные
/// сэмплы через `write_audio_sample` / `write_video_sample`. Mute просто
/// перестает пропускать аудио-сэмплы в трек.
pub struct WebRtcMediaEngine {
    config: MediaConfig,
    sink: Option<EventSink<MediaEvent>>,
    peer_connection: Option<Arc<RTCPeerConnection>>,
    audio_track: Option<Arc<TrackLocalStaticSample>>,
    video_track: Option<Arc<TrackLocalStaticSample>>,
    muted: Arc<AtomicBool>,
    disposed: bool,
}

impl WebRtcMediaEngine {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            config,
            sink: None,
            peer_connection: None,
            audio_track: None,
            video_track: None,
            muted: Arc::new(AtomicBool::new(false)),
            disposed: false,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    /// Пишет закодированный Opus-кадр. Пока микрофон выключен, кадры отбрасываются.
    pub async fn write_audio_sample(&self, data: Bytes, duration: Duration) -> Result<()> {
        if self.is_muted() {
            return Ok(());
        }
        let Some(track) = &self.audio_track else {
            return Err(anyhow!("local media is not prepared"));
        };
        track
            .write_sample(&Sample {
                data,
                duration,
                ..Default::default()
            })
            .await?;
        Ok(())
    }

    /// Пишет закодированный VP8-кадр (только для `AudioVideo`).
    pub async fn write_video_sample(&self, data: Bytes, duration: Duration) -> Result<()> {
        let Some(track) = &self.video_track else {
            return Err(anyhow!("no local video track"));
        };
        track
            .write_sample(&Sample {
                data,
                duration,
                ..Default::default()
            })
            .await?;
        Ok(())
    }

    fn peer_connection(&self) -> Result<&Arc<RTCPeerConnection>> {
        self.peer_connection
            .as_ref()
            .ok_or_else(|| anyhow!("peer connection is not created (local media not prepared)"))
    }

    async fn new_peer_connection(&self) -> Result<Arc<RTCPeerConnection>> {
        // Кодеки регистрируем полностью, даже для audio-only.
        let mut m = RtcMediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: self
                .config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        Ok(Arc::new(api.new_peer_connection(rtc_config).await?))
    }

    fn register_callbacks(&self, peer_connection: &RTCPeerConnection, sink: EventSink<MediaEvent>) {
        let state_sink = sink.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let sink = state_sink.clone();
                Box::pin(async move {
                    info!("Peer connection state changed: {:?}", s);
                    let state = match s {
                        RTCPeerConnectionState::Unspecified | RTCPeerConnectionState::New => {
                            ConnectivityState::New
                        }
                        RTCPeerConnectionState::Connecting => ConnectivityState::Connecting,
                        RTCPeerConnectionState::Connected => ConnectivityState::Connected,
                        RTCPeerConnectionState::Disconnected => ConnectivityState::Disconnected,
                        RTCPeerConnectionState::Failed => ConnectivityState::Failed,
                        RTCPeerConnectionState::Closed => ConnectivityState::Closed,
                    };
                    sink.emit(MediaEvent::ConnectivityChanged(state));
                })
            },
        ));

        // Trickle ICE: отдаем локальных кандидатов сессии по мере сбора.
        let ice_sink = sink.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let sink = ice_sink.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let init = match candidate.to_json() {
                    Ok(init) => init,
                    Err(e) => {
                        warn!("Failed to serialize local ICE candidate: {}", e);
                        return;
                    }
                };
                sink.emit(MediaEvent::LocalCandidate(IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                }));
            })
        }));

        let track_sink = sink;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let sink = track_sink.clone();
                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Video => MediaKind::Video,
                        _ => MediaKind::Audio,
                    };
                    debug!("Remote {:?} track in stream {}", kind, track.stream_id());
                    sink.emit(MediaEvent::RemoteStreamAdded(RemoteStream {
                        stream_id: track.stream_id(),
                        kind,
                    }));
                })
            },
        ));
    }

    async fn add_local_track(
        peer_connection: &RTCPeerConnection,
        mime_type: &str,
        track_id: &str,
    ) -> Result<Arc<TrackLocalStaticSample>> {
        let track = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: mime_type.to_owned(),
                ..Default::default()
            },
            track_id.to_owned(),
            STREAM_ID.to_owned(),
        ));

        let sender = peer_connection
            .add_track(Arc::clone(&track) as Arc<dyn TrackLocal + Send + Sync>)
            .await
            .with_context(|| format!("failed to add local {track_id} track"))?;
        tokio::spawn(drain_rtcp(sender));

        Ok(track)
    }
}

/// Interceptors only see RTCP if someone reads it off the sender.
async fn drain_rtcp(sender: Arc<RTCRtpSender>) {
    let mut buf = vec![0u8; 1500];
    while sender.read(&mut buf).await.is_ok() {}
}

fn to_rtc_description(description: SessionDescription) -> Result<RTCSessionDescription> {
    let desc = match description.kind {
        SdpKind::Offer => RTCSessionDescription::offer(description.sdp)?,
        SdpKind::Answer => RTCSessionDescription::answer(description.sdp)?,
    };
    Ok(desc)
}

#[async_trait]
impl MediaEngine for WebRtcMediaEngine {
    fn set_event_sink(&mut self, sink: EventSink<MediaEvent>) {
        self.sink = Some(sink);
    }

    async fn prepare_local_media(&mut self, mode: CallMode) -> Result<()> {
        if self.disposed {
            return Err(anyhow!("media engine is disposed"));
        }
        if self.peer_connection.is_some() {
            return Ok(());
        }

        let peer_connection = self.new_peer_connection().await?;
        if let Some(sink) = self.sink.clone() {
            self.register_callbacks(&peer_connection, sink);
        }

        let audio = Self::add_local_track(&peer_connection, MIME_TYPE_OPUS, "audio").await?;
        self.audio_track = Some(audio);

        if mode.has_video() {
            let video = Self::add_local_track(&peer_connection, MIME_TYPE_VP8, "video").await?;
            self.video_track = Some(video);
        }

        info!("Local media prepared ({})", mode);
        self.peer_connection = Some(peer_connection);
        Ok(())
    }

    async fn create_offer(&mut self) -> Result<SessionDescription> {
        let offer = self.peer_connection()?.create_offer(None).await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&mut self) -> Result<SessionDescription> {
        let answer = self.peer_connection()?.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn apply_local_description(&mut self, description: SessionDescription) -> Result<()> {
        let desc = to_rtc_description(description)?;
        self.peer_connection()?.set_local_description(desc).await?;
        Ok(())
    }

    async fn apply_remote_description(&mut self, description: SessionDescription) -> Result<()> {
        let desc = to_rtc_description(description)?;
        self.peer_connection()?.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_remote_candidate(&mut self, candidate: IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            ..Default::default()
        };
        self.peer_connection()?
            .add_ice_candidate(init)
            .await
            .context("failed to add remote ICE candidate")?;
        Ok(())
    }

    fn mute(&mut self) {
        self.muted.store(true, Ordering::Relaxed);
    }

    fn unmute(&mut self) {
        self.muted.store(false, Ordering::Relaxed);
    }

    async fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.audio_track = None;
        self.video_track = None;
        if let Some(peer_connection) = self.peer_connection.take() {
            if let Err(e) = peer_connection.close().await {
                warn!("Failed to close peer connection: {}", e);
            }
        }
        debug!("WebRTC media engine disposed");
    }
}
