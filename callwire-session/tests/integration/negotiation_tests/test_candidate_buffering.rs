use callwire_core::{CallMode, CommandKind, SdpKind, SignalingCommand};
use callwire_session::{CallSession, CallState, MediaEvent};

use super::candidate;
use crate::integration::{established_session, outbound_session};
use crate::utils::{
    FailPoint, MediaCall, MockMediaEngine, RawPeer, RecordingObserver, free_port, init_tracing,
    test_config, wait_for_state,
};

#[tokio::test]
async fn test_candidates_before_offer_are_applied_after_it_in_order() {
    init_tracing();

    let port = free_port();
    let (media, control) = MockMediaEngine::new("local");
    let observer = RecordingObserver::new();
    let session = CallSession::new(test_config(), media, observer.clone());
    session
        .start_call(&format!("127.0.0.1:{port}"), CallMode::AudioOnly)
        .unwrap();
    assert!(observer.wait_for_waiting(5000).await);

    let mut peer = RawPeer::connect(port).await.unwrap();
    peer.send(&SignalingCommand::candidate(candidate(1))).await.unwrap();
    peer.send(&SignalingCommand::candidate(candidate(2))).await.unwrap();
    peer.send(&SignalingCommand::offer("offer-from-remote"))
        .await
        .unwrap();
    peer.send(&SignalingCommand::candidate(candidate(3))).await.unwrap();

    let last = MediaCall::AddCandidate(candidate(3).candidate);
    assert!(control.wait_for_call(&last, 5000).await);
    assert!(wait_for_state(&session, CallState::Established).await);

    assert_eq!(
        control.added_candidates(),
        vec![
            candidate(1).candidate,
            candidate(2).candidate,
            candidate(3).candidate,
        ]
    );
    let offer_applied = control
        .position(&MediaCall::ApplyRemote(SdpKind::Offer))
        .unwrap();
    let first_candidate = control
        .position(&MediaCall::AddCandidate(candidate(1).candidate))
        .unwrap();
    assert!(offer_applied < first_candidate);
}

#[tokio::test]
async fn test_candidates_before_answer_wait_for_it() {
    init_tracing();

    let (session, control, _observer, mut peer) = outbound_session().await;

    peer.send(&SignalingCommand::candidate(candidate(7))).await.unwrap();
    peer.send(&SignalingCommand::answer("answer-from-remote"))
        .await
        .unwrap();

    assert!(wait_for_state(&session, CallState::Established).await);
    let answer_applied = control
        .position(&MediaCall::ApplyRemote(SdpKind::Answer))
        .unwrap();
    let added = control
        .position(&MediaCall::AddCandidate(candidate(7).candidate))
        .expect("buffered candidate should be applied");
    assert!(answer_applied < added);
}

#[tokio::test]
async fn test_rejected_candidate_does_not_end_call() {
    init_tracing();

    let (session, control, observer, mut peer) = established_session().await;
    control.fail_on(FailPoint::AddCandidate);

    peer.send(&SignalingCommand::candidate(candidate(1))).await.unwrap();
    assert!(
        control
            .wait_for_call(&MediaCall::AddCandidate(candidate(1).candidate), 5000)
            .await
    );

    assert_eq!(session.state(), CallState::Established);
    assert!(observer.errors().await.is_empty());
}

#[tokio::test]
async fn test_local_candidates_are_forwarded_to_peer() {
    init_tracing();

    let (_session, control, _observer, mut peer) = established_session().await;

    control.emit(MediaEvent::LocalCandidate(candidate(4)));
    control.emit(MediaEvent::LocalCandidate(candidate(5)));

    for n in [4, 5] {
        let cmd = peer.recv().await.unwrap();
        assert_eq!(cmd.kind, CommandKind::Candidate);
        assert_eq!(cmd.ice_candidate(), Some(candidate(n)));
    }
}
