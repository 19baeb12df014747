use callwire_core::{SdpKind, SignalingCommand};
use callwire_session::CallState;

use super::candidate;
use crate::integration::{established_session, outbound_session};
use crate::utils::{MediaCall, init_tracing, wait_for_state};

#[tokio::test]
async fn test_bad_frames_are_dropped_and_call_survives() {
    init_tracing();

    let (session, control, observer, mut peer) = established_session().await;

    peer.send_raw("this is not json").await.unwrap();
    peer.send_raw(r#"["offer"]"#).await.unwrap();
    peer.send_raw(r#"{"type":"offer"}"#).await.unwrap();
    peer.send_raw(r#"{"type":"hangup","reason":"bye"}"#)
        .await
        .unwrap();
    peer.send(&SignalingCommand::candidate(candidate(1))).await.unwrap();

    // The candidate behind the junk still gets through.
    assert!(
        control
            .wait_for_call(&MediaCall::AddCandidate(candidate(1).candidate), 5000)
            .await
    );
    assert_eq!(session.state(), CallState::Established);
    assert!(observer.events().await.is_empty());
}

#[tokio::test]
async fn test_offer_after_role_is_fixed_is_rejected() {
    init_tracing();

    let (session, control, observer, mut peer) = outbound_session().await;

    // Glare: both sides offered. Ours went first, theirs is rejected.
    peer.send(&SignalingCommand::offer("offer-from-remote"))
        .await
        .unwrap();
    peer.send(&SignalingCommand::answer("answer-from-remote"))
        .await
        .unwrap();

    assert!(wait_for_state(&session, CallState::Established).await);
    assert_eq!(control.count(&MediaCall::ApplyRemote(SdpKind::Offer)), 0);
    assert_eq!(control.count(&MediaCall::CreateAnswer), 0);

    // And once established, a renegotiation attempt is rejected too.
    peer.send(&SignalingCommand::offer("second-offer"))
        .await
        .unwrap();
    peer.send(&SignalingCommand::candidate(candidate(2))).await.unwrap();
    assert!(
        control
            .wait_for_call(&MediaCall::AddCandidate(candidate(2).candidate), 5000)
            .await
    );
    assert_eq!(control.count(&MediaCall::ApplyRemote(SdpKind::Offer)), 0);
    assert_eq!(session.state(), CallState::Established);
    assert!(observer.errors().await.is_empty());
}

#[tokio::test]
async fn test_unsolicited_answer_is_rejected() {
    init_tracing();

    let (session, control, _observer, mut peer) = established_session().await;

    peer.send(&SignalingCommand::answer("late-answer")).await.unwrap();
    peer.send(&SignalingCommand::candidate(candidate(3))).await.unwrap();
    assert!(
        control
            .wait_for_call(&MediaCall::AddCandidate(candidate(3).candidate), 5000)
            .await
    );

    assert_eq!(control.count(&MediaCall::ApplyRemote(SdpKind::Answer)), 1);
    assert_eq!(session.state(), CallState::Established);
}
