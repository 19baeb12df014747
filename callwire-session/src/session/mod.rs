mod call_command;
mod call_error;
mod call_loop;
mod call_observer;
mod call_session;
mod call_state;
mod session_config;
mod session_event;

pub use call_command::CallCommand;
pub use call_error::CallError;
pub use call_observer::CallObserver;
pub use call_session::CallSession;
pub use call_state::{CallSnapshot, CallState, NegotiationPhase};
pub use session_config::SessionConfig;
pub use session_event::SessionEvent;
