//! Newline-framed JSON encoding of [`SignalingCommand`].
//!
//! Wire shape: `{"type":"offer","sdp":"..."}`,
//! `{"type":"candidate","sdpMid":"0","sdpMLineIndex":0,"sdpCandidate":"..."}`.
//! Absent fields are omitted, never sent as `null`.

use crate::error::DecodeError;
use crate::model::{CommandKind, SignalingCommand};
use serde::Serialize;
use serde_json::{Map, Value};

const FIELD_TYPE: &str = "type";
const FIELD_SDP: &str = "sdp";
const FIELD_MID: &str = "sdpMid";
const FIELD_MLINE_INDEX: &str = "sdpMLineIndex";
const FIELD_CANDIDATE: &str = "sdpCandidate";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireCommand<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sdp: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sdp_mid: Option<&'a str>,
    #[serde(rename = "sdpMLineIndex", skip_serializing_if = "Option::is_none")]
    sdp_m_line_index: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sdp_candidate: Option<&'a str>,
}

/// Encodes a command as one line of JSON. The output never contains a
/// line terminator: control characters inside strings are escaped.
pub fn encode(command: &SignalingCommand) -> String {
    let wire = WireCommand {
        kind: command.kind.as_str(),
        sdp: command.sdp.as_deref(),
        sdp_mid: command.candidate_mid.as_deref(),
        sdp_m_line_index: command.candidate_media_line_index,
        sdp_candidate: command.candidate_data.as_deref(),
    };

    // Serializing a struct of strings and integers into a String cannot fail.
    serde_json::to_string(&wire).unwrap_or_default()
}

/// Decodes one frame. Fields irrelevant to the decoded kind are dropped;
/// unknown kinds keep every recognised field that was present.
pub fn decode(text: &str) -> Result<SignalingCommand, DecodeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::Syntax(e.to_string()))?;
    let Value::Object(obj) = value else {
        return Err(DecodeError::NotAnObject);
    };

    let tag = optional_str(&obj, FIELD_TYPE)?.ok_or(DecodeError::MissingField(FIELD_TYPE))?;
    let kind = CommandKind::from_wire(&tag);

    let command = match kind {
        CommandKind::Offer => SignalingCommand::offer(required_str(&obj, FIELD_SDP)?),
        CommandKind::Answer => SignalingCommand::answer(required_str(&obj, FIELD_SDP)?),
        CommandKind::Candidate => SignalingCommand {
            kind: CommandKind::Candidate,
            sdp: None,
            candidate_mid: optional_str(&obj, FIELD_MID)?,
            candidate_media_line_index: optional_index(&obj, FIELD_MLINE_INDEX)?,
            candidate_data: Some(required_str(&obj, FIELD_CANDIDATE)?),
        },
        CommandKind::Unknown(tag) => SignalingCommand {
            sdp: optional_str(&obj, FIELD_SDP)?,
            candidate_mid: optional_str(&obj, FIELD_MID)?,
            candidate_media_line_index: optional_index(&obj, FIELD_MLINE_INDEX)?,
            candidate_data: optional_str(&obj, FIELD_CANDIDATE)?,
            ..SignalingCommand::unknown(tag)
        },
    };

    Ok(command)
}

fn optional_str(obj: &Map<String, Value>, field: &'static str) -> Result<Option<String>, DecodeError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DecodeError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

fn required_str(obj: &Map<String, Value>, field: &'static str) -> Result<String, DecodeError> {
    optional_str(obj, field)?.ok_or(DecodeError::MissingField(field))
}

fn optional_index(obj: &Map<String, Value>, field: &'static str) -> Result<Option<u16>, DecodeError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .map(Some)
            .ok_or(DecodeError::InvalidField {
                field,
                expected: "an integer in 0..=65535",
            }),
        Some(_) => Err(DecodeError::InvalidField {
            field,
            expected: "an integer in 0..=65535",
        }),
    }
}
