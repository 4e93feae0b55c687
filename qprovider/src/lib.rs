//! Message model, model catalog, and the completion-client boundary.

mod client;
mod codec;
mod config;
mod error;
mod message;
mod stream;
mod tools;

pub mod prelude {
    pub use crate::{
        BoxedCompletionStream, ChatModelSpec, ClientFuture, CompletionClient, CompletionError,
        CompletionErrorKind, CompletionEvent, CompletionRequest, ConfigError, ConfigErrorKind,
        Decoded, FinishReason, Message, ModelConfig, ModelMessage, ModelOutput, Role,
        SummaryMessage, SystemMessage, ToolParameter, ToolResult, ToolSpec, ToolUsage,
        UserMessage, VecCompletionStream, codec,
    };
}

pub use client::{ClientFuture, CompletionClient, CompletionRequest};
pub use codec::{Decoded, codec};
pub use config::{ChatModelSpec, ModelConfig};
pub use error::{CompletionError, CompletionErrorKind, ConfigError, ConfigErrorKind};
pub use message::{
    FinishReason, Message, ModelMessage, ModelOutput, Role, SUMMARY_MESSAGE_ID,
    SUMMARY_MESSAGE_NAME, SummaryMessage, SystemMessage, ToolResult, ToolUsage, UserMessage,
    validate_name,
};
pub use stream::{
    BoxedCompletionStream, CompletionEvent, CompletionEventStream, VecCompletionStream,
};
pub use tools::{ToolParameter, ToolSpec};
