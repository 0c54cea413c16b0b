use async_trait::async_trait;
use dashmap::DashMap;
use medlink_core::{IceCandidate, PeerRole, RoomId, SessionDescription};
use medlink_peer::SignalingError;
use medlink_peer::signaling::SignalingClient;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct MockRoom {
    offer: Option<SessionDescription>,
    answer: Option<SessionDescription>,
    caller_candidates: Vec<IceCandidate>,
    callee_candidates: Vec<IceCandidate>,
}

impl MockRoom {
    fn candidates(&self, role: PeerRole) -> &Vec<IceCandidate> {
        match role {
            PeerRole::Caller => &self.caller_candidates,
            PeerRole::Callee => &self.callee_candidates,
        }
    }

    fn candidates_mut(&mut self, role: PeerRole) -> &mut Vec<IceCandidate> {
        match role {
            PeerRole::Caller => &mut self.caller_candidates,
            PeerRole::Callee => &mut self.callee_candidates,
        }
    }
}

#[derive(Default)]
struct MockRelayInner {
    rooms: DashMap<String, MockRoom>,
    offer_fetches: AtomicUsize,
    answer_fetches: AtomicUsize,
    candidate_fetches: AtomicUsize,
    candidate_publishes: AtomicUsize,
    answer_hidden_polls: AtomicUsize,
}

/// In-process stand-in for the relay.
///
/// Counts every signaling call so tests can assert that a cancelled
/// session goes quiet, and can hold a stored answer back for a
/// configurable number of polls to exercise the polling loop.
#[derive(Clone, Default)]
pub struct MockRelay {
    inner: Arc<MockRelayInner>,
}

impl MockRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `fetch_answer` reporting absent for the first `polls` calls,
    /// even once an answer is stored.
    pub fn hide_answer_for(&self, polls: usize) {
        self.inner.answer_hidden_polls.store(polls, Ordering::SeqCst);
    }

    pub fn answer_fetches(&self) -> usize {
        self.inner.answer_fetches.load(Ordering::SeqCst)
    }

    pub fn candidate_publishes(&self) -> usize {
        self.inner.candidate_publishes.load(Ordering::SeqCst)
    }

    /// Every fetch issued against the relay, across all endpoints.
    pub fn total_fetches(&self) -> usize {
        self.inner.offer_fetches.load(Ordering::SeqCst)
            + self.inner.answer_fetches.load(Ordering::SeqCst)
            + self.inner.candidate_fetches.load(Ordering::SeqCst)
    }

    pub fn published_candidates(&self, room: &RoomId, role: PeerRole) -> Vec<IceCandidate> {
        self.inner
            .rooms
            .get(room.as_str())
            .map(|r| r.candidates(role).clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SignalingClient for MockRelay {
    async fn publish_offer(
        &self,
        room: &RoomId,
        offer: &SessionDescription,
    ) -> Result<(), SignalingError> {
        self.inner
            .rooms
            .entry(room.as_str().to_owned())
            .or_default()
            .offer = Some(offer.clone());
        Ok(())
    }

    async fn fetch_offer(
        &self,
        room: &RoomId,
    ) -> Result<Option<SessionDescription>, SignalingError> {
        self.inner.offer_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .inner
            .rooms
            .get(room.as_str())
            .and_then(|r| r.offer.clone()))
    }

    async fn publish_answer(
        &self,
        room: &RoomId,
        answer: &SessionDescription,
    ) -> Result<(), SignalingError> {
        self.inner
            .rooms
            .entry(room.as_str().to_owned())
            .or_default()
            .answer = Some(answer.clone());
        Ok(())
    }

    async fn fetch_answer(
        &self,
        room: &RoomId,
    ) -> Result<Option<SessionDescription>, SignalingError> {
        let seen = self.inner.answer_fetches.fetch_add(1, Ordering::SeqCst);
        if seen < self.inner.answer_hidden_polls.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self
            .inner
            .rooms
            .get(room.as_str())
            .and_then(|r| r.answer.clone()))
    }

    async fn publish_candidate(
        &self,
        room: &RoomId,
        role: PeerRole,
        candidate: &IceCandidate,
    ) -> Result<(), SignalingError> {
        self.inner.candidate_publishes.fetch_add(1, Ordering::SeqCst);
        self.inner
            .rooms
            .entry(room.as_str().to_owned())
            .or_default()
            .candidates_mut(role)
            .push(candidate.clone());
        Ok(())
    }

    async fn fetch_candidates(
        &self,
        room: &RoomId,
        role: PeerRole,
    ) -> Result<Vec<IceCandidate>, SignalingError> {
        self.inner.candidate_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.published_candidates(room, role))
    }
}
