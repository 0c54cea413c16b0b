use medlink_core::IceCandidate;
use std::collections::HashSet;

/// What to do with a remote candidate that just came off a poll.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum GateDecision {
    /// Fingerprint already processed; the cumulative fetch returned it
    /// again (or the same candidate arrived twice).
    Duplicate,
    /// Remote description not set yet; held back in arrival order.
    Buffered,
    /// Gate is open; apply to the peer connection now.
    Apply,
}

/// Dedup set plus pre-description buffer for remote candidates, and the
/// publish-side dedup for locally discovered ones.
///
/// Invariants: a candidate reaches the peer connection at most once, and
/// never before the remote description is set. The buffer is drained
/// exactly once when the gate opens and never reused.
pub(crate) struct CandidateGate {
    seen: HashSet<String>,
    pending: Vec<IceCandidate>,
    remote_description_set: bool,
}

impl CandidateGate {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            pending: Vec::new(),
            remote_description_set: false,
        }
    }

    /// Decide the fate of a remote candidate, recording its fingerprint
    /// so the next cumulative poll skips it.
    pub fn admit(&mut self, candidate: &IceCandidate) -> GateDecision {
        if !self.seen.insert(candidate.fingerprint().to_owned()) {
            return GateDecision::Duplicate;
        }
        if self.remote_description_set {
            GateDecision::Apply
        } else {
            self.pending.push(candidate.clone());
            GateDecision::Buffered
        }
    }

    /// Open the gate (irreversibly) and hand back the buffered
    /// candidates in arrival order.
    pub fn open(&mut self) -> Vec<IceCandidate> {
        self.remote_description_set = true;
        std::mem::take(&mut self.pending)
    }

    pub fn is_open(&self) -> bool {
        self.remote_description_set
    }

    /// Publish-side dedup. `false` means this candidate was already
    /// published once (duplicate discovery events are platform behavior).
    pub fn record_local(&mut self, candidate: &IceCandidate) -> bool {
        self.seen.insert(candidate.fingerprint().to_owned())
    }
}
