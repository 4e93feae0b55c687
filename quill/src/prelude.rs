//! Common imports for most quill applications.

pub use crate::{summary_message, system_message, tool_result, user_message};
pub use crate::{
    BoxFuture, ChatEngine, ChatEngineBuilder, ChatError, ChatErrorKind, ChatModelSpec,
    ChatObserver, CodecRegistry, CompletionClient, CompletionError, CompletionEvent,
    CompletionRequest, ConfigError, ConversationMemory, Decoded, EventsManager, FinishReason,
    FunctionTool, InMemoryConversationMemory, Message, MetadataMap, MetricsChatObserver,
    ModelConfig, ModelMessage, ModelOutput, Role, Serializable, SessionId, SummaryMessage,
    SystemMessage, Tool, ToolError, ToolParameter, ToolResult, ToolSpec, ToolUsage, ToolsManager,
    TracingChatObserver, UserMessage, codec, serialize,
};
