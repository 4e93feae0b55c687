//! Decode errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    UnknownTag,
    Malformed,
    MissingField,
    InvalidField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub message: String,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown_tag(tag: impl Display) -> Self {
        Self::new(
            DecodeErrorKind::UnknownTag,
            format!("no decoder registered for type tag '{tag}'"),
        )
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(DecodeErrorKind::Malformed, message)
    }

    pub fn missing_field(key: impl Display) -> Self {
        Self::new(
            DecodeErrorKind::MissingField,
            format!("missing required field '{key}'"),
        )
    }

    pub fn invalid_field(message: impl Into<String>) -> Self {
        Self::new(DecodeErrorKind::InvalidField, message)
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_constructors_set_kind_and_message() {
        let unknown = DecodeError::unknown_tag("Widget");
        assert_eq!(unknown.kind, DecodeErrorKind::UnknownTag);
        assert!(unknown.message.contains("Widget"));

        let missing = DecodeError::missing_field("content");
        assert_eq!(missing.kind, DecodeErrorKind::MissingField);
        assert!(missing.to_string().contains("content"));
    }
}
