use crate::integration::{init_tracing, test_config, wait_for_state};
use crate::utils::MockRelay;
use medlink_core::{PeerRole, RoomId};
use medlink_peer::{CallState, start_as_callee, start_as_caller};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Discovery callbacks may fire more than once for the same candidate;
/// the relay must still see each distinct candidate at most once per
/// role.
#[tokio::test]
async fn test_local_candidates_published_once() {
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

    let mut stored = 0;
    for role in [PeerRole::Caller, PeerRole::Callee] {
        let published = relay.published_candidates(&room, role);
        assert!(
            !published.is_empty(),
            "{role} should have trickled at least one candidate"
        );
        let distinct: HashSet<&str> = published.iter().map(|c| c.fingerprint()).collect();
        assert_eq!(
            distinct.len(),
            published.len(),
            "{role} published a duplicate candidate"
        );
        stored += published.len();
    }
    // every publish call landed a distinct candidate; none were retries
    // of something already stored
    assert_eq!(relay.candidate_publishes(), stored);

    caller.close().await.expect("caller close");
    callee.close().await.expect("callee close");
}
