mod signaling_channel;

pub(crate) use signaling_channel::SignalingChannel;
