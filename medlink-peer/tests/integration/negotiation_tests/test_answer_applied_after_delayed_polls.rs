use crate::integration::{init_tracing, test_config, wait_for_state};
use crate::utils::MockRelay;
use medlink_core::RoomId;
use medlink_peer::{CallState, start_as_callee, start_as_caller};
use std::sync::Arc;
use std::time::Duration;

/// The answer only becomes visible to the caller after several polls;
/// the polling loop must keep trying and apply it exactly once.
#[tokio::test]
async fn test_answer_applied_after_delayed_polls() {
    init_tracing();

    let relay = Arc::new(MockRelay::new());
    relay.hide_answer_for(3);
    let room = RoomId::generate();

    let callee = start_as_callee(relay.clone(), room.clone(), test_config())
        .await
        .expect("failed to start callee");
    let caller = start_as_caller(relay.clone(), room.clone(), test_config())
        .await
        .expect("failed to start caller");

    wait_for_state(&caller, Duration::from_secs(15), |s| {
        matches!(
            s,
            CallState::AnswerApplied | CallState::Connected
        )
    })
    .await
    .expect("caller never applied the answer");

    // the first three polls came back empty by construction
    assert!(
        relay.answer_fetches() >= 4,
        "expected at least 4 answer polls, saw {}",
        relay.answer_fetches()
    );

    wait_for_state(&caller, Duration::from_secs(15), |s| {
        s == CallState::Connected
    })
    .await
    .expect("caller never connected");

    caller.close().await.expect("caller close");
    callee.close().await.expect("callee close");
}
