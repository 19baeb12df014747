mod event_sink;
pub mod media;
pub mod session;
mod signaling;
pub mod transport;

pub use event_sink::EventSink;
pub use media::*;
pub use session::*;
pub use transport::*;
