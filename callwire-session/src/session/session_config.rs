use crate::transport::TransportConfig;

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub transport: TransportConfig,
}
