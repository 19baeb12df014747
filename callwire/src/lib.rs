pub use callwire_core::model::{CallMode, ConnectionRole, PeerAddress, SessionId};

pub mod model {
    pub use callwire_core::model::*;
}

pub mod codec {
    pub use callwire_core::codec::*;
    pub use callwire_core::error::DecodeError;
}

#[cfg(feature = "session")]
pub mod session {
    pub use callwire_session::*;
}
