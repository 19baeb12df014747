use callwire_core::IceServerConfig;

/// Конфигурация WebRTC-движка.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::stun("stun:stun.l.google.com:19302")],
        }
    }
}
