use crate::integration::{init_tracing, test_config, wait_for_state};
use crate::utils::MockRelay;
use medlink_core::RoomId;
use medlink_peer::{CallState, start_as_caller};
use std::sync::Arc;
use std::time::Duration;

/// No callee ever answers; the caller keeps polling until `close`, and
/// not a single signaling request may be issued afterwards.
#[tokio::test]
async fn test_close_stops_polling() {
    init_tracing();

    let relay = Arc::new(MockRelay::new());
    let room = RoomId::generate();
    let config = test_config();

    let caller = start_as_caller(relay.clone(), room, config.clone())
        .await
        .expect("failed to start caller");

    wait_for_state(&caller, Duration::from_secs(5), |s| {
        s == CallState::AwaitingAnswer
    })
    .await
    .expect("caller never started polling");

    tokio::time::sleep(config.poll_interval * 4).await;
    assert!(relay.total_fetches() > 0, "polling should be under way");

    caller.close().await.expect("close failed");
    assert_eq!(caller.state(), CallState::Closed);

    // requests in flight at cancellation time may still land
    tokio::time::sleep(config.poll_interval * 2).await;
    let snapshot = relay.total_fetches();

    tokio::time::sleep(config.poll_interval * 10).await;
    assert_eq!(
        relay.total_fetches(),
        snapshot,
        "closed session must not issue signaling requests"
    );
}
