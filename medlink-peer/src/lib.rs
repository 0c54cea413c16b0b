//! Peer-to-peer call negotiation over a request/response signaling relay.
//!
//! The two sides of a call — caller and callee — never talk to each other
//! while negotiating; they are coupled only through a relay room both of
//! them poll. The caller publishes an offer and polls for the answer; the
//! callee polls for the offer and publishes an answer; both trickle their
//! ICE candidates into the room as they are discovered and poll for the
//! other side's. A per-session candidate gate (dedup set plus
//! pre-description buffer) turns the relay's cumulative candidate feed
//! into exactly-once application, and a poll supervisor cancels every
//! timer-driven task of a session together once it reaches a terminal
//! state.

pub mod config;
pub mod error;
pub mod negotiation;
pub mod signaling;
pub mod transport;

pub use config::NegotiationConfig;
pub use error::{NegotiationError, SignalingError};
pub use negotiation::{CallHandle, CallState, FailureReason, start_as_callee, start_as_caller};
