mod media_config;
mod media_engine;
mod media_event;
mod webrtc_engine;

pub use media_config::MediaConfig;
pub use media_engine::MediaEngine;
pub use media_event::{ConnectivityState, MediaEvent, MediaKind, RemoteStream};
pub use webrtc_engine::WebRtcMediaEngine;
