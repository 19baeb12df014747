use thiserror::Error;

/// A signaling frame that could not be decoded. Always names the field
/// (or `<frame>` for the frame as a whole) that was wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("`<frame>` is not valid JSON: {0}")]
    Syntax(String),

    #[error("`<frame>` is not a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

impl DecodeError {
    /// The offending field, `"<frame>"` when the frame itself is unusable.
    pub fn field(&self) -> &'static str {
        match self {
            DecodeError::Syntax(_) | DecodeError::NotAnObject => "<frame>",
            DecodeError::MissingField(field) => field,
            DecodeError::InvalidField { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    #[error("address must be ASCII")]
    NotAscii,

    #[error("address `{0}` has no `:port` suffix")]
    MissingPort(String),

    #[error("address has an empty host")]
    EmptyHost,

    #[error("invalid host `{0}`")]
    InvalidHost(String),

    #[error("invalid port `{0}`")]
    InvalidPort(String),
}
