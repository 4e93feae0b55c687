//! Unified facade over the quill workspace crates.
//!
//! This crate is designed to be the single dependency for most applications.
//! It re-exports the core quill crates and provides convenience helpers for
//! common message-building flows.

pub mod prelude;
pub mod util;

pub use qchat;
pub use qcodec;
pub use qcommon;
pub use qevents;
pub use qobserve;
pub use qprovider;
pub use qtooling;

pub use qchat::{
    ChatEngine, ChatEngineBuilder, ChatError, ChatErrorKind, ChatFuture, ConversationMemory,
    InMemoryConversationMemory,
};
pub use qcodec::{
    Blob, CodecRegistry, DecodeError, DecodeErrorKind, Params, Serializable, looks_like_blob,
    parse_blob, serialize,
};
pub use qcommon::{BoxFuture, MetadataMap, Registry, SessionId};
pub use qevents::{ChatObserver, EventsManager, NoopChatObserver};
pub use qobserve::{MetricsChatObserver, TracingChatObserver, UsageTotals};
pub use qprovider::{
    BoxedCompletionStream, ChatModelSpec, ClientFuture, CompletionClient, CompletionError,
    CompletionErrorKind, CompletionEvent, CompletionEventStream, CompletionRequest, ConfigError,
    ConfigErrorKind, Decoded, FinishReason, Message, ModelConfig, ModelMessage, ModelOutput, Role,
    SUMMARY_MESSAGE_ID, SUMMARY_MESSAGE_NAME, SummaryMessage, SystemMessage, ToolParameter,
    ToolResult, ToolSpec, ToolUsage, UserMessage, codec, validate_name,
};
pub use qtooling::{
    FunctionTool, Tool, ToolError, ToolErrorKind, ToolFuture, ToolOutcome, ToolsManager,
};

pub use util::{summary_message, system_message, tool_result, user_message};

#[cfg(test)]
mod tests {
    use crate::Role;

    #[test]
    fn message_helpers_build_expected_variants() {
        let user = crate::user_message("hello");
        assert_eq!(crate::Message::from(user).role(), Role::User);

        let system = crate::system_message("be concise");
        assert_eq!(crate::Message::from(system).role(), Role::System);

        let result = crate::tool_result("18C", "weather").expect("valid name");
        assert_eq!(crate::Message::from(result).role(), Role::Function);
    }

    #[test]
    fn facade_codec_resolves_workspace_variants() {
        let registry = crate::codec();
        let blob = crate::serialize(&crate::user_message("hello"));

        let decoded = registry
            .decode(&blob)
            .expect("decode should work")
            .into_message()
            .expect("blob holds a message");
        assert_eq!(decoded.content(), "hello");
    }
}
