mod test_candidate_buffering;
mod test_protocol_errors;
mod test_webrtc_loopback;

use callwire_core::IceCandidate;

pub fn candidate(n: u16) -> IceCandidate {
    IceCandidate {
        candidate: format!("candidate:{n} 1 udp 2130706431 127.0.0.1 {} typ host", 50000 + n),
        sdp_mid: Some("0".to_string()),
        sdp_m_line_index: Some(0),
    }
}
