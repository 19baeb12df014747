use callwire_session::{
    CallState, ConnectivityState, MediaEvent, MediaKind, RemoteStream,
};

use crate::integration::established_session;
use crate::utils::{MediaCall, ObserverEvent, init_tracing, wait_for_state};

#[tokio::test]
async fn test_remote_stream_is_reported_to_observer() {
    init_tracing();

    let (session, control, observer, _peer) = established_session().await;

    let stream = RemoteStream {
        stream_id: "remote".to_string(),
        kind: MediaKind::Video,
    };
    control.emit(MediaEvent::RemoteStreamAdded(stream.clone()));

    assert!(
        observer
            .wait_for(|e| *e == ObserverEvent::RemoteStreamAdded(stream.clone()), 5000)
            .await
    );
    assert_eq!(session.state(), CallState::Established);
}

#[tokio::test]
async fn test_connectivity_progress_is_not_terminal() {
    init_tracing();

    let (session, control, observer, _peer) = established_session().await;

    control.emit(MediaEvent::ConnectivityChanged(ConnectivityState::Connecting));
    control.emit(MediaEvent::ConnectivityChanged(ConnectivityState::Connected));
    control.emit(MediaEvent::RemoteStreamAdded(RemoteStream {
        stream_id: "marker".to_string(),
        kind: MediaKind::Audio,
    }));

    assert!(
        observer
            .wait_for(|e| matches!(e, ObserverEvent::RemoteStreamAdded(_)), 5000)
            .await
    );
    assert_eq!(session.state(), CallState::Established);
}

#[tokio::test]
async fn test_media_disconnect_ends_call() {
    init_tracing();

    let (session, control, observer, mut peer) = established_session().await;

    control.emit(MediaEvent::ConnectivityChanged(ConnectivityState::Disconnected));

    assert!(wait_for_state(&session, CallState::Ended).await);
    assert!(observer.wait_for_end(5000).await);
    assert_eq!(observer.ended_count().await, 1);
    assert!(observer.errors().await.is_empty());

    // The signaling connection goes down with the call.
    peer.wait_closed().await.unwrap();
    assert!(control.wait_for_call(&MediaCall::Dispose, 5000).await);
}

#[tokio::test]
async fn test_media_failure_fails_call() {
    init_tracing();

    let (session, control, observer, _peer) = established_session().await;

    control.emit(MediaEvent::ConnectivityChanged(ConnectivityState::Failed));

    assert!(wait_for_state(&session, CallState::Failed).await);
    assert!(observer.wait_for_end(5000).await);
    assert_eq!(observer.errors().await.len(), 1);
    assert_eq!(observer.ended_count().await, 0);
    assert!(control.wait_for_call(&MediaCall::Dispose, 5000).await);
}
