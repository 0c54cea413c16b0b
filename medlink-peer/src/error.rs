use thiserror::Error;

/// Failures at the relay boundary.
#[derive(Debug, Error)]
pub enum SignalingError {
    /// Transport-level failure talking to the relay. Treated as
    /// transient: the polling loop is the retry mechanism, so this is
    /// never fatal mid-negotiation.
    #[error("relay unavailable: {0}")]
    RelayUnavailable(String),

    /// The relay answered with something we could not decode.
    #[error("malformed relay response: {0}")]
    MalformedResponse(String),
}

/// Failures surfaced by `start_as_caller` / `start_as_callee`.
///
/// Only session setup reports through this type; everything after the
/// handle exists is reported as a terminal `CallState` transition.
#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error(transparent)]
    Signaling(#[from] SignalingError),

    #[error("peer connection failure: {0}")]
    Peer(anyhow::Error),
}

impl From<anyhow::Error> for NegotiationError {
    fn from(err: anyhow::Error) -> Self {
        NegotiationError::Peer(err)
    }
}
