use crate::error::NegotiationError;
use crate::negotiation::session::Session;
use crate::negotiation::state::CallState;
use medlink_core::{PeerRole, RoomId};
use std::sync::Arc;
use tokio::sync::watch;
use webrtc::data_channel::RTCDataChannel;

/// Live view of one negotiation session, handed to the surrounding
/// application. The data channel is exposed opaquely once the call is
/// up; everything else about the session stays internal.
pub struct CallHandle {
    session: Arc<Session>,
    state_rx: watch::Receiver<CallState>,
}

impl CallHandle {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        let state_rx = session.state_tx.subscribe();
        Self { session, state_rx }
    }

    pub fn room(&self) -> &RoomId {
        &self.session.room
    }

    pub fn role(&self) -> PeerRole {
        self.session.role
    }

    pub fn state(&self) -> CallState {
        self.session.state()
    }

    /// Watch channel carrying every state transition.
    pub fn watch_state(&self) -> watch::Receiver<CallState> {
        self.state_rx.clone()
    }

    /// The negotiated data channel, once open. `None` until then.
    pub async fn data_channel(&self) -> Option<Arc<RTCDataChannel>> {
        self.session.data_channel.lock().await.clone()
    }

    /// Tear the session down: cancel every polling task, close the peer
    /// connection, settle in `Closed`. Idempotent.
    pub async fn close(&self) -> Result<(), NegotiationError> {
        self.session.supervisor.cancel_all();
        let result = self.session.peer.close().await;
        self.session.advance(CallState::Closed);
        result.map_err(NegotiationError::from)
    }
}
