use crate::integration::{init_tracing, test_config, wait_for_data_channel, wait_for_state};
use crate::utils::MockRelay;
use bytes::Bytes;
use medlink_core::RoomId;
use medlink_peer::{CallState, start_as_callee, start_as_caller};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_full_call_cycle() {
    init_tracing();

    let relay = Arc::new(MockRelay::new());
    let room = RoomId::generate();

    let callee = start_as_callee(relay.clone(), room.clone(), test_config())
        .await
        .expect("failed to start callee");
    let caller = start_as_caller(relay.clone(), room.clone(), test_config())
        .await
        .expect("failed to start caller");

    wait_for_state(&caller, Duration::from_secs(15), |s| {
        s == CallState::Connected
    })
    .await
    .expect("caller never connected");
    wait_for_state(&callee, Duration::from_secs(15), |s| {
        s == CallState::Connected
    })
    .await
    .expect("callee never connected");

    // Channel handoff: the callee listens, the caller speaks.
    let callee_channel = wait_for_data_channel(&callee, Duration::from_secs(5))
        .await
        .expect("callee data channel");
    let (msg_tx, mut msg_rx) = mpsc::channel::<Vec<u8>>(8);
    callee_channel.on_message(Box::new(move |msg| {
        let tx = msg_tx.clone();
        Box::pin(async move {
            let _ = tx.send(msg.data.to_vec()).await;
        })
    }));

    let caller_channel = wait_for_data_channel(&caller, Duration::from_secs(5))
        .await
        .expect("caller data channel");
    caller_channel
        .send(&Bytes::from_static(b"hello from the caller"))
        .await
        .expect("failed to send over data channel");

    let received = tokio::time::timeout(Duration::from_secs(5), msg_rx.recv())
        .await
        .expect("no message within deadline")
        .expect("message channel closed");
    assert_eq!(received, b"hello from the caller");

    caller.close().await.expect("caller close");
    callee.close().await.expect("callee close");
    assert_eq!(caller.state(), CallState::Closed);
    assert_eq!(callee.state(), CallState::Closed);
}
