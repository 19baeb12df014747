use callwire_session::{CallSession, CallSnapshot, CallState, SessionConfig, TransportConfig};
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::Level;

/// Timeout for a session to reach an expected state (ms).
pub const STATE_TIMEOUT_MS: u64 = 5000;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Loopback-only config with a short connect timeout.
pub fn test_config() -> SessionConfig {
    SessionConfig {
        transport: TransportConfig {
            connect_timeout: Duration::from_millis(500),
            listen_host: Ipv4Addr::LOCALHOST.into(),
            ..TransportConfig::default()
        },
    }
}

/// A port nothing is listening on right now.
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

/// A listener for the remote side, plus the address a session should dial.
pub async fn remote_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind remote listener");
    let port = listener.local_addr().expect("local addr").port();
    (listener, format!("127.0.0.1:{port}"))
}

/// Wait until the session snapshot satisfies `pred`, returning that snapshot.
pub async fn wait_for_snapshot(
    session: &CallSession,
    pred: impl FnMut(&CallSnapshot) -> bool,
) -> Option<CallSnapshot> {
    let mut rx = session.subscribe();
    let reached = tokio::time::timeout(
        Duration::from_millis(STATE_TIMEOUT_MS),
        rx.wait_for(pred),
    )
    .await;
    match reached {
        Ok(Ok(snapshot)) => Some(*snapshot),
        _ => None,
    }
}

pub async fn wait_for_state(session: &CallSession, state: CallState) -> bool {
    wait_for_snapshot(session, |s| s.state == state).await.is_some()
}
