mod candidate;
mod description;
mod role;
mod room;

pub use candidate::IceCandidate;
pub use description::{SdpKind, SessionDescription};
pub use role::PeerRole;
pub use room::RoomId;
