use callwire_core::{CallMode, ConnectionRole};
use callwire_session::{CallSession, CallState, MediaConfig, WebRtcMediaEngine};

use crate::utils::{RecordingObserver, free_port, init_tracing, test_config, wait_for_snapshot};

fn engine() -> WebRtcMediaEngine {
    // Host candidates only; the test must not depend on a STUN server.
    WebRtcMediaEngine::new(MediaConfig {
        ice_servers: Vec::new(),
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_webrtc_engines_negotiate_over_loopback() {
    init_tracing();

    let address = format!("127.0.0.1:{}", free_port());

    let callee_observer = RecordingObserver::new();
    let callee = CallSession::new(test_config(), engine(), callee_observer.clone());
    callee.start_call(&address, CallMode::AudioVideo).unwrap();
    assert!(callee_observer.wait_for_waiting(5000).await);

    let caller_observer = RecordingObserver::new();
    let caller = CallSession::new(test_config(), engine(), caller_observer.clone());
    caller.start_call(&address, CallMode::AudioVideo).unwrap();

    let caller_snapshot = wait_for_snapshot(&caller, |s| s.state == CallState::Established)
        .await
        .expect("caller should be established");
    let callee_snapshot = wait_for_snapshot(&callee, |s| s.state == CallState::Established)
        .await
        .expect("callee should be established");

    assert_eq!(caller_snapshot.role, Some(ConnectionRole::Initiator));
    assert_eq!(callee_snapshot.role, Some(ConnectionRole::Answerer));
    assert!(caller_observer.errors().await.is_empty());
    assert!(callee_observer.errors().await.is_empty());

    caller.end_call();
    assert_eq!(caller.finished().await, CallState::Ended);
    assert!(callee_observer.wait_for_end(5000).await);
    assert_eq!(callee.finished().await, CallState::Ended);
}
