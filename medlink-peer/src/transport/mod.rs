mod event;
mod peer_link;

pub use event::PeerEvent;
pub use peer_link::PeerLink;
