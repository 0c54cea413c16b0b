use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two sides of a negotiation. The caller initiates with an offer,
/// the callee responds with an answer. Candidate lists on the relay are
/// keyed by the role that published them.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PeerRole {
    Caller,
    Callee,
}

impl PeerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeerRole::Caller => "caller",
            PeerRole::Callee => "callee",
        }
    }

    /// The role on the other side of the room.
    pub fn counterpart(&self) -> PeerRole {
        match self {
            PeerRole::Caller => PeerRole::Callee,
            PeerRole::Callee => PeerRole::Caller,
        }
    }
}

impl FromStr for PeerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "caller" => Ok(PeerRole::Caller),
            "callee" => Ok(PeerRole::Callee),
            other => Err(format!("unknown peer role '{other}'")),
        }
    }
}

impl fmt::Display for PeerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
