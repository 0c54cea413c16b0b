use dashmap::DashMap;
use medlink_core::{IceCandidate, PeerRole, SessionDescription};
use std::sync::Arc;

#[derive(Default)]
struct RoomState {
    offer: Option<SessionDescription>,
    answer: Option<SessionDescription>,
    caller_candidates: Vec<IceCandidate>,
    callee_candidates: Vec<IceCandidate>,
}

impl RoomState {
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

/// In-memory room table.
///
/// Descriptions are last-write-wins (a double publish is a client bug but
/// must not corrupt the room), candidate lists are append-only and always
/// returned in full — deduplication is the client's job.
#[derive(Clone, Default)]
pub struct RelayStore {
    rooms: Arc<DashMap<String, RoomState>>,
}

impl RelayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offer(&self, room: &str, desc: SessionDescription) {
        self.rooms.entry(room.to_owned()).or_default().offer = Some(desc);
    }

    pub fn offer(&self, room: &str) -> Option<SessionDescription> {
        self.rooms.get(room).and_then(|r| r.offer.clone())
    }

    pub fn set_answer(&self, room: &str, desc: SessionDescription) {
        self.rooms.entry(room.to_owned()).or_default().answer = Some(desc);
    }

    pub fn answer(&self, room: &str) -> Option<SessionDescription> {
        self.rooms.get(room).and_then(|r| r.answer.clone())
    }

    pub fn append_candidate(&self, room: &str, role: PeerRole, candidate: IceCandidate) {
        self.rooms
            .entry(room.to_owned())
            .or_default()
            .candidates_mut(role)
            .push(candidate);
    }

    pub fn candidates(&self, room: &str, role: PeerRole) -> Vec<IceCandidate> {
        self.rooms
            .get(room)
            .map(|r| r.candidates(role).clone())
            .unwrap_or_default()
    }
}
