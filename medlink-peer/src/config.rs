use std::time::Duration;

/// Knobs for one negotiation session.
#[derive(Clone)]
pub struct NegotiationConfig {
    /// STUN/TURN urls handed to the peer connection.
    pub ice_servers: Vec<String>,
    /// Interval between relay polls while negotiating.
    pub poll_interval: Duration,
    /// Candidate poll interval once the connection is up. Late trickle
    /// candidates still arrive, but the rush is over.
    pub connected_poll_interval: Duration,
    /// Deadline for the callee's offer wait.
    pub offer_timeout: Duration,
    /// Deadline for the caller's answer wait.
    pub answer_timeout: Duration,
    /// Publish attempts per local candidate before it is dropped with a
    /// warning.
    pub publish_retry_limit: u32,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec!["stun:stun.l.google.com:19302".to_owned()],
            poll_interval: Duration::from_secs(1),
            connected_poll_interval: Duration::from_secs(3),
            offer_timeout: Duration::from_secs(30),
            answer_timeout: Duration::from_secs(30),
            publish_retry_limit: 3,
        }
    }
}
