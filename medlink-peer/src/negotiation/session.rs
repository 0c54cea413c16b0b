use crate::config::NegotiationConfig;
use crate::negotiation::gate::{CandidateGate, GateDecision};
use crate::negotiation::state::{CallState, FailureReason};
use crate::negotiation::supervisor::PollSupervisor;
use crate::signaling::SignalingClient;
use crate::transport::{PeerEvent, PeerLink};
use medlink_core::{IceCandidate, PeerRole, RoomId};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use webrtc::data_channel::RTCDataChannel;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;

/// Everything one negotiation session owns: the peer connection, the
/// candidate gate, the poll supervisor and the state channel. Confined
/// to the session's own tasks; never shared across roles or rooms.
pub(crate) struct Session {
    pub signaling: Arc<dyn SignalingClient>,
    pub room: RoomId,
    pub role: PeerRole,
    pub config: NegotiationConfig,
    pub peer: Arc<PeerLink>,
    pub gate: Mutex<CandidateGate>,
    pub supervisor: PollSupervisor,
    pub state_tx: watch::Sender<CallState>,
    pub data_channel: Mutex<Option<Arc<RTCDataChannel>>>,
}

impl Session {
    pub fn new(
        signaling: Arc<dyn SignalingClient>,
        room: RoomId,
        role: PeerRole,
        config: NegotiationConfig,
        peer: Arc<PeerLink>,
    ) -> Arc<Self> {
        let (state_tx, _) = watch::channel(CallState::Idle);
        Arc::new(Self {
            signaling,
            room,
            role,
            config,
            peer,
            gate: Mutex::new(CandidateGate::new()),
            supervisor: PollSupervisor::new(),
            state_tx,
            data_channel: Mutex::new(None),
        })
    }

    pub fn state(&self) -> CallState {
        *self.state_tx.borrow()
    }

    /// Single-writer discipline for the state machine; terminal states
    /// stick.
    pub fn advance(&self, next: CallState) {
        self.state_tx.send_if_modified(|state| {
            if state.may_become(&next) && *state != next {
                debug!(room = %self.room, role = %self.role, "state {:?} -> {:?}", state, next);
                *state = next;
                true
            } else {
                false
            }
        });
    }

    pub fn fail(&self, reason: FailureReason) {
        warn!(room = %self.room, role = %self.role, "negotiation failed: {reason:?}");
        self.advance(CallState::Failed(reason));
        self.supervisor.cancel_all();
    }

    /// Flip the gate after the remote description is applied and drain
    /// the buffer in arrival order. One bad candidate never blocks the
    /// rest. The gate lock is held through the drain so freshly polled
    /// candidates cannot overtake the buffered ones.
    pub async fn open_candidate_gate(&self) {
        let mut gate = self.gate.lock().await;
        if gate.is_open() {
            return;
        }
        let buffered = gate.open();
        if !buffered.is_empty() {
            debug!(room = %self.room, "draining {} buffered candidate(s)", buffered.len());
        }
        for candidate in &buffered {
            if let Err(err) = self.peer.apply_remote_candidate(candidate).await {
                warn!(room = %self.room, "failed to apply buffered candidate: {err:#}");
            }
        }
    }

    /// Event pump for the peer connection. Terminal connection states
    /// cancel every polling task of the session.
    pub fn spawn_event_loop(
        self: &Arc<Self>,
        mut event_rx: mpsc::Receiver<PeerEvent>,
        publish_tx: mpsc::Sender<IceCandidate>,
    ) {
        let session = self.clone();
        let mut cancel = self.supervisor.subscribe();
        self.supervisor.spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = cancel.changed() => break,
                    event = event_rx.recv() => match event {
                        Some(event) => event,
                        None => break,
                    },
                };

                match event {
                    PeerEvent::StateChanged(state) => match state {
                        RTCPeerConnectionState::Connected => {
                            session.advance(CallState::Connected);
                        }
                        RTCPeerConnectionState::Failed => {
                            session.fail(FailureReason::Transport);
                            break;
                        }
                        RTCPeerConnectionState::Disconnected => {
                            session.advance(CallState::Disconnected);
                            session.supervisor.cancel_all();
                            break;
                        }
                        RTCPeerConnectionState::Closed => {
                            session.advance(CallState::Closed);
                            session.supervisor.cancel_all();
                            break;
                        }
                        _ => {}
                    },
                    PeerEvent::LocalCandidate(candidate) => {
                        let fresh = session.gate.lock().await.record_local(&candidate);
                        if !fresh {
                            debug!(room = %session.room, "duplicate local candidate discovery ignored");
                        } else if publish_tx.try_send(candidate).is_err() {
                            warn!(room = %session.room, "candidate publish queue full, dropping");
                        }
                    }
                    PeerEvent::DataChannelOpen(channel) => {
                        info!(
                            room = %session.room,
                            role = %session.role,
                            "data channel '{}' open",
                            channel.label()
                        );
                        *session.data_channel.lock().await = Some(channel);
                    }
                }
            }
        });
    }

    /// Publisher for locally discovered candidates. Fire-and-forget from
    /// the discovery callback's perspective, but each candidate gets a
    /// bounded number of publish attempts so a transient relay failure
    /// doesn't silently drop a candidate needed for connectivity.
    pub fn spawn_candidate_publisher(self: &Arc<Self>) -> mpsc::Sender<IceCandidate> {
        let (publish_tx, mut publish_rx) = mpsc::channel::<IceCandidate>(64);
        let session = self.clone();
        let mut cancel = self.supervisor.subscribe();
        self.supervisor.spawn(async move {
            loop {
                let candidate = tokio::select! {
                    _ = cancel.changed() => break,
                    candidate = publish_rx.recv() => match candidate {
                        Some(candidate) => candidate,
                        None => break,
                    },
                };
                session.publish_with_retry(&candidate).await;
                if session.supervisor.is_cancelled() {
                    break;
                }
            }
        });
        publish_tx
    }

    async fn publish_with_retry(&self, candidate: &IceCandidate) {
        let attempts = self.config.publish_retry_limit.max(1);
        for attempt in 1..=attempts {
            if self.supervisor.is_cancelled() {
                return;
            }
            match self
                .signaling
                .publish_candidate(&self.room, self.role, candidate)
                .await
            {
                Ok(()) => return,
                Err(err) if attempt < attempts => {
                    debug!(
                        room = %self.room,
                        "candidate publish attempt {attempt} failed, retrying: {err}"
                    );
                    sleep(self.config.poll_interval).await;
                }
                Err(err) => {
                    warn!(
                        room = %self.room,
                        "dropping local candidate after {attempt} failed publish attempt(s): {err}"
                    );
                }
            }
        }
    }

    /// Poll the counterpart's cumulative candidate list and feed every
    /// entry through the gate. Runs until the session is cancelled — the
    /// connection coming up is not a stop condition, late trickle
    /// candidates still arrive — but the interval relaxes once
    /// `Connected`.
    pub fn spawn_candidate_poll(self: &Arc<Self>) {
        let session = self.clone();
        let mut cancel = self.supervisor.subscribe();
        self.supervisor.spawn(async move {
            let remote_role = session.role.counterpart();
            loop {
                let interval = if session.state() == CallState::Connected {
                    session.config.connected_poll_interval
                } else {
                    session.config.poll_interval
                };
                tokio::select! {
                    _ = cancel.changed() => break,
                    _ = sleep(interval) => {}
                }

                let fetched = session.signaling.fetch_candidates(&session.room, remote_role).await;
                if session.supervisor.is_cancelled() {
                    // session closed while the request was in flight
                    break;
                }
                let candidates = match fetched {
                    Ok(candidates) => candidates,
                    Err(err) => {
                        debug!(room = %session.room, "candidate poll failed, retrying next tick: {err}");
                        continue;
                    }
                };

                for candidate in candidates {
                    let mut gate = session.gate.lock().await;
                    match gate.admit(&candidate) {
                        GateDecision::Duplicate => {}
                        GateDecision::Buffered => {
                            debug!(room = %session.room, "buffered candidate ahead of remote description");
                        }
                        GateDecision::Apply => {
                            if let Err(err) = session.peer.apply_remote_candidate(&candidate).await {
                                warn!(room = %session.room, "failed to apply candidate: {err:#}");
                            }
                        }
                    }
                }
            }
        });
    }
}
