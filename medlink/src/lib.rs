pub use medlink_core::{IceCandidate, PeerRole, RoomId, SdpKind, SessionDescription};

pub mod model {
    pub use medlink_core::*;
}

#[cfg(feature = "peer")]
pub mod peer {
    pub use medlink_peer::*;
}

#[cfg(feature = "relay")]
pub mod relay {
    pub use medlink_relay::*;
}
