mod address;
mod call;
mod ice;
mod sdp;
mod session;
mod signaling;

pub use address::PeerAddress;
pub use call::{CallMode, ConnectionRole};
pub use ice::{IceCandidate, IceServerConfig};
pub use sdp::{SdpKind, SessionDescription};
pub use session::SessionId;
pub use signaling::{CommandKind, SignalingCommand};
