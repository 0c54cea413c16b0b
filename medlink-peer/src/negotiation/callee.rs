use crate::config::NegotiationConfig;
use crate::error::NegotiationError;
use crate::negotiation::handle::CallHandle;
use crate::negotiation::session::Session;
use crate::negotiation::state::{CallState, FailureReason};
use crate::signaling::SignalingClient;
use crate::transport::PeerLink;
use medlink_core::{PeerRole, RoomId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// Start the callee side of a call: wait (bounded) for the caller's
/// offer, answer it, and exchange trickle candidates.
///
/// Candidate polling starts before the offer arrives; anything that
/// shows up early sits in the gate's buffer until the offer is applied.
pub async fn start_as_callee(
    signaling: Arc<dyn SignalingClient>,
    room: RoomId,
    config: NegotiationConfig,
) -> Result<CallHandle, NegotiationError> {
    let (event_tx, event_rx) = mpsc::channel(64);
    let peer = Arc::new(PeerLink::new(&config, event_tx).await?);

    let session = Session::new(signaling, room, PeerRole::Callee, config, peer);
    let publish_tx = session.spawn_candidate_publisher();
    session.spawn_event_loop(event_rx, publish_tx);

    session.advance(CallState::AwaitingOffer);
    session.spawn_candidate_poll();
    spawn_offer_wait(&session);

    Ok(CallHandle::new(session))
}

/// Poll for the offer until it shows up or the deadline passes, then
/// apply it, drain the candidate buffer, and publish the answer.
fn spawn_offer_wait(session: &Arc<Session>) {
    let session = session.clone();
    let supervisor = session.supervisor.clone();
    supervisor.spawn(async move {
        let mut cancel = session.supervisor.subscribe();
        let deadline = Instant::now() + session.config.offer_timeout;

        let offer = loop {
            tokio::select! {
                _ = cancel.changed() => return,
                _ = sleep(session.config.poll_interval) => {}
            }
            if Instant::now() >= deadline {
                session.fail(FailureReason::Timeout);
                return;
            }

            let fetched = session.signaling.fetch_offer(&session.room).await;
            if session.supervisor.is_cancelled() {
                return;
            }
            match fetched {
                Ok(Some(offer)) => break offer,
                Ok(None) => {}
                Err(err) => {
                    debug!(room = %session.room, "offer poll failed, retrying next tick: {err}");
                }
            }
        };

        if let Err(err) = session.peer.apply_remote_description(&offer).await {
            warn!(room = %session.room, "failed to apply offer: {err:#}");
            session.fail(FailureReason::Transport);
            return;
        }
        session.open_candidate_gate().await;
        session.advance(CallState::OfferApplied);

        let answer = match session.peer.create_answer().await {
            Ok(answer) => answer,
            Err(err) => {
                warn!(room = %session.room, "failed to create answer: {err:#}");
                session.fail(FailureReason::Transport);
                return;
            }
        };

        loop {
            if session.supervisor.is_cancelled() {
                return;
            }
            match session.signaling.publish_answer(&session.room, &answer).await {
                Ok(()) => break,
                Err(err) => {
                    debug!(room = %session.room, "answer publish failed, retrying: {err}");
                    if Instant::now() >= deadline {
                        session.fail(FailureReason::Timeout);
                        return;
                    }
                    tokio::select! {
                        _ = cancel.changed() => return,
                        _ = sleep(session.config.poll_interval) => {}
                    }
                }
            }
        }
        session.advance(CallState::AnswerPublished);
    });
}
