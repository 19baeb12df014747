use crate::error::AddressParseError;
use std::fmt;
use std::str::FromStr;

/// `host:port` of the remote peer. The same port is used for the listen
/// fallback when the outbound attempt fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerAddress {
    host: String,
    port: u16,
}

impl PeerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, AddressParseError> {
        let host = host.into();
        if host.is_empty() {
            return Err(AddressParseError::EmptyHost);
        }
        if port == 0 {
            return Err(AddressParseError::InvalidPort("0".to_owned()));
        }
        Ok(Self { host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for PeerAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_ascii() {
            return Err(AddressParseError::NotAscii);
        }

        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| AddressParseError::MissingPort(s.to_owned()))?;

        // [::1]:9000
        let host = match host.strip_prefix('[') {
            Some(rest) => rest
                .strip_suffix(']')
                .ok_or_else(|| AddressParseError::InvalidHost(host.to_owned()))?,
            None if host.contains(':') => {
                return Err(AddressParseError::InvalidHost(host.to_owned()));
            }
            None => host,
        };

        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AddressParseError::InvalidPort(port.to_owned()));
        }
        let port: u16 = port
            .parse()
            .map_err(|_| AddressParseError::InvalidPort(port.to_owned()))?;

        Self::new(host, port)
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
