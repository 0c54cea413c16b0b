use medlink_core::IceCandidate;
use std::sync::Arc;
use webrtc::data_channel::RTCDataChannel;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;

/// Events the peer connection pushes into the session's event loop.
pub enum PeerEvent {
    StateChanged(RTCPeerConnectionState),
    /// A local candidate was discovered and should be published.
    LocalCandidate(IceCandidate),
    /// The negotiated data channel is open and ready for handoff.
    DataChannelOpen(Arc<RTCDataChannel>),
}
