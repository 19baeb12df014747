use async_trait::async_trait;
use callwire_session::{CallObserver, RemoteStream};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverEvent {
    WaitingForPeer(SocketAddr),
    RemoteStreamAdded(RemoteStream),
    CallEnded,
    ConnectionError(String),
}

/// CallObserver that records every callback.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ObserverEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn events(&self) -> Vec<ObserverEvent> {
        self.events.lock().await.clone()
    }

    pub async fn ended_count(&self) -> usize {
        self.count(|e| matches!(e, ObserverEvent::CallEnded)).await
    }

    pub async fn errors(&self) -> Vec<String> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|e| match e {
                ObserverEvent::ConnectionError(reason) => Some(reason.clone()),
                _ => None,
            })
            .collect()
    }

    async fn count(&self, pred: impl Fn(&ObserverEvent) -> bool) -> usize {
        self.events.lock().await.iter().filter(|e| pred(*e)).count()
    }

    /// Wait until an event matching `pred` is recorded.
    pub async fn wait_for(&self, pred: impl Fn(&ObserverEvent) -> bool, timeout_ms: u64) -> bool {
        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(timeout_ms);

        while start.elapsed() < timeout {
            if self.count(&pred).await > 0 {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    pub async fn wait_for_waiting(&self, timeout_ms: u64) -> bool {
        self.wait_for(|e| matches!(e, ObserverEvent::WaitingForPeer(_)), timeout_ms)
            .await
    }

    pub async fn wait_for_end(&self, timeout_ms: u64) -> bool {
        self.wait_for(
            |e| matches!(e, ObserverEvent::CallEnded | ObserverEvent::ConnectionError(_)),
            timeout_ms,
        )
        .await
    }

    async fn push(&self, event: ObserverEvent) {
        tracing::debug!("[RecordingObserver] {:?}", event);
        self.events.lock().await.push(event);
    }
}

#[async_trait]
impl CallObserver for RecordingObserver {
    async fn on_remote_stream_added(&self, stream: RemoteStream) {
        self.push(ObserverEvent::RemoteStreamAdded(stream)).await;
    }

    async fn on_call_ended(&self) {
        self.push(ObserverEvent::CallEnded).await;
    }

    async fn on_connection_error(&self, reason: String) {
        self.push(ObserverEvent::ConnectionError(reason)).await;
    }

    async fn on_waiting_for_peer(&self, local_addr: SocketAddr) {
        self.push(ObserverEvent::WaitingForPeer(local_addr)).await;
    }
}
