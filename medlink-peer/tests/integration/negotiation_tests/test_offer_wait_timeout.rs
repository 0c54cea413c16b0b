use crate::integration::{init_tracing, test_config, wait_for_state};
use crate::utils::MockRelay;
use medlink_core::RoomId;
use medlink_peer::{CallState, FailureReason, start_as_callee};
use std::sync::Arc;
use std::time::Duration;

/// Nobody ever publishes an offer: the callee's wait is bounded and
/// surfaces a timeout failure instead of polling forever. After the
/// failure the session goes quiet on the relay.
#[tokio::test]
async fn test_offer_wait_timeout() {
    init_tracing();

    let relay = Arc::new(MockRelay::new());
    let room = RoomId::generate();

    let mut config = test_config();
    config.offer_timeout = Duration::from_millis(200);

    let callee = start_as_callee(relay.clone(), room, config.clone())
        .await
        .expect("failed to start callee");

    let state = wait_for_state(&callee, Duration::from_secs(5), |s| {
        matches!(s, CallState::Failed(_))
    })
    .await
    .expect("callee never failed");
    assert_eq!(state, CallState::Failed(FailureReason::Timeout));

    // let requests that were in flight at cancellation time finish
    tokio::time::sleep(config.poll_interval * 4).await;
    let snapshot = relay.total_fetches();

    tokio::time::sleep(config.poll_interval * 10).await;
    assert_eq!(
        relay.total_fetches(),
        snapshot,
        "failed session must stop polling the relay"
    );
}
