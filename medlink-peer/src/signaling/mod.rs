mod http;

pub use http::HttpSignalingClient;

use crate::error::SignalingError;
use async_trait::async_trait;
use medlink_core::{IceCandidate, PeerRole, RoomId, SessionDescription};

/// Thin client over the relay's room state.
///
/// Every operation is idempotent and safe to retry: descriptions are
/// last-write-wins on the relay and candidate lists are append-only.
/// An absent offer or answer is a normal poll result, not an error.
#[async_trait]
pub trait SignalingClient: Send + Sync {
    async fn publish_offer(
        &self,
        room: &RoomId,
        offer: &SessionDescription,
    ) -> Result<(), SignalingError>;

    async fn fetch_offer(&self, room: &RoomId) -> Result<Option<SessionDescription>, SignalingError>;

    async fn publish_answer(
        &self,
        room: &RoomId,
        answer: &SessionDescription,
    ) -> Result<(), SignalingError>;

    async fn fetch_answer(
        &self,
        room: &RoomId,
    ) -> Result<Option<SessionDescription>, SignalingError>;

    async fn publish_candidate(
        &self,
        room: &RoomId,
        role: PeerRole,
        candidate: &IceCandidate,
    ) -> Result<(), SignalingError>;

    /// Full list of `role`'s candidates known so far, not a delta.
    /// Callers diff against what they have already processed.
    async fn fetch_candidates(
        &self,
        room: &RoomId,
        role: PeerRole,
    ) -> Result<Vec<IceCandidate>, SignalingError>;
}
