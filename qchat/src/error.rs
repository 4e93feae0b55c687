//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    Config,
    Completion,
    Memory,
    Tooling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Config, message)
    }

    pub fn completion(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Completion, message)
    }

    pub fn memory(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Memory, message)
    }

    pub fn tooling(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Tooling, message)
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<qprovider::ConfigError> for ChatError {
    fn from(value: qprovider::ConfigError) -> Self {
        Self::config(value.to_string())
    }
}

impl From<qprovider::CompletionError> for ChatError {
    fn from(value: qprovider::CompletionError) -> Self {
        Self::completion(value.to_string())
    }
}

impl From<qtooling::ToolError> for ChatError {
    fn from(value: qtooling::ToolError) -> Self {
        Self::tooling(value.to_string())
    }
}
