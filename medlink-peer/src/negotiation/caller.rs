use crate::config::NegotiationConfig;
use crate::error::NegotiationError;
use crate::negotiation::handle::CallHandle;
use crate::negotiation::session::Session;
use crate::negotiation::state::{CallState, FailureReason};
use crate::signaling::SignalingClient;
use crate::transport::PeerLink;
use medlink_core::{PeerRole, RoomId, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

const DATA_CHANNEL_LABEL: &str = "medlink";

/// Start the caller side of a call: create the connection and its data
/// channel, publish an offer into the room, then poll for the answer and
/// for the callee's trickle candidates.
///
/// Returns as soon as the session is set up; progress and failures after
/// that are reported through the handle's state channel.
pub async fn start_as_caller(
    signaling: Arc<dyn SignalingClient>,
    room: RoomId,
    config: NegotiationConfig,
) -> Result<CallHandle, NegotiationError> {
    let (event_tx, event_rx) = mpsc::channel(64);
    let peer = Arc::new(PeerLink::new(&config, event_tx).await?);
    peer.open_data_channel(DATA_CHANNEL_LABEL).await?;

    let session = Session::new(signaling, room, PeerRole::Caller, config, peer);
    let publish_tx = session.spawn_candidate_publisher();
    session.spawn_event_loop(event_rx, publish_tx);

    let offer = session.peer.create_offer().await?;
    session.advance(CallState::OfferCreated);

    session.spawn_candidate_poll();
    spawn_answer_wait(&session, offer);

    Ok(CallHandle::new(session))
}

/// Publish the offer, then poll for the answer until it shows up or the
/// deadline passes. Stops itself once the answer is applied; candidate
/// polling keeps running.
fn spawn_answer_wait(session: &Arc<Session>, offer: SessionDescription) {
    let session = session.clone();
    let supervisor = session.supervisor.clone();
    supervisor.spawn(async move {
        let mut cancel = session.supervisor.subscribe();
        let deadline = Instant::now() + session.config.answer_timeout;

        // A relay that is briefly down at call start is no different
        // from one that is down mid-poll: retry on the same interval.
        loop {
            if Instant::now() >= deadline {
                session.fail(FailureReason::Timeout);
                return;
            }
            match session.signaling.publish_offer(&session.room, &offer).await {
                Ok(()) => break,
                Err(err) => {
                    debug!(room = %session.room, "offer publish failed, retrying: {err}");
                }
            }
            tokio::select! {
                _ = cancel.changed() => return,
                _ = sleep(session.config.poll_interval) => {}
            }
        }
        session.advance(CallState::AwaitingAnswer);

        loop {
            tokio::select! {
                _ = cancel.changed() => return,
                _ = sleep(session.config.poll_interval) => {}
            }
            if Instant::now() >= deadline {
                session.fail(FailureReason::Timeout);
                return;
            }

            let fetched = session.signaling.fetch_answer(&session.room).await;
            if session.supervisor.is_cancelled() {
                return;
            }
            match fetched {
                Ok(Some(answer)) => {
                    if let Err(err) = session.peer.apply_remote_description(&answer).await {
                        warn!(room = %session.room, "failed to apply answer: {err:#}");
                        session.fail(FailureReason::Transport);
                        return;
                    }
                    session.open_candidate_gate().await;
                    session.advance(CallState::AnswerApplied);
                    return;
                }
                Ok(None) => {}
                Err(err) => {
                    debug!(room = %session.room, "answer poll failed, retrying next tick: {err}");
                }
            }
        }
    });
}
