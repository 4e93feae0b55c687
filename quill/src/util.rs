//! Convenience constructors for common message-building flows.
//!
//! ```rust
//! use quill::{system_message, user_message};
//!
//! let _prompt = system_message("You are concise and technical.");
//! let _question = user_message("Summarize the repo");
//! ```

use qprovider::{ConfigError, SummaryMessage, SystemMessage, ToolResult, UserMessage};

pub fn user_message(content: impl Into<String>) -> UserMessage {
    UserMessage::new(content)
}

pub fn system_message(content: impl Into<String>) -> SystemMessage {
    SystemMessage::new(content)
}

pub fn summary_message(content: impl Into<String>) -> SummaryMessage {
    SummaryMessage::new(content)
}

pub fn tool_result(
    content: impl Into<String>,
    name: impl Into<String>,
) -> Result<ToolResult, ConfigError> {
    ToolResult::new(content, name)
}
