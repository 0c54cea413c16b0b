use serde::{Deserialize, Serialize};
use std::fmt;

/// One ICE candidate in its serialized wire form (the JSON encoding of
/// the underlying `RTCIceCandidateInit`).
///
/// Two candidates are the same candidate iff their payloads are
/// byte-identical; the payload doubles as the deduplication fingerprint.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct IceCandidate(String);

impl IceCandidate {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn payload(&self) -> &str {
        &self.0
    }

    /// Key used by the dedup set. Exact serialized equality.
    pub fn fingerprint(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
