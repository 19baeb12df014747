mod outgoing_queue;
mod signaling_transport;
mod transport_config;
mod transport_error;
mod transport_event;

pub use signaling_transport::SignalingTransport;
pub use transport_config::{QueueLimit, TransportConfig};
pub use transport_error::TransportError;
pub use transport_event::{ConnectionOrigin, TransportEvent};
