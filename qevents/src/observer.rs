//! Observer contract for generation-loop lifecycle events.
//!
//! Every capability defaults to a no-op, so implementors opt into exactly the
//! subset they care about; a capability an observer does not override never
//! has an observable effect on it.
//!
//! ```rust
//! use qevents::{ChatObserver, NoopChatObserver};
//!
//! fn accepts_observer(_observer: &dyn ChatObserver) {}
//!
//! let observer = NoopChatObserver;
//! accepts_observer(&observer);
//! ```

use qcommon::BoxFuture;
use qprovider::{
    CompletionError, Message, ModelConfig, ModelMessage, ModelOutput, ToolResult, ToolSpec,
    ToolUsage,
};

/// Lifecycle hooks of one generation run.
///
/// Payloads per capability:
/// - `on_model_start`: run configuration, full ordered context, declared
///   tools.
/// - `on_model_generation`: one streamed partial packet.
/// - `on_model_end`: the final message of a generation pass, which may be a
///   tool usage.
/// - `on_tool_use` / `on_tool_result`: the requested invocation and its
///   conversational result.
/// - `on_model_reply`: the final conversational reply only.
/// - `on_model_error`: the completion failure that ended the run.
/// - `on_model_interrupt`: cooperative cancellation took effect.
pub trait ChatObserver: Send + Sync {
    fn on_model_start<'a>(
        &'a self,
        _config: &'a ModelConfig,
        _context: &'a [Message],
        _tools: &'a [ToolSpec],
    ) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }

    fn on_model_generation<'a>(&'a self, _packet: &'a ModelOutput) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }

    fn on_model_end<'a>(&'a self, _message: &'a ModelOutput) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }

    fn on_tool_use<'a>(&'a self, _usage: &'a ToolUsage) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }

    fn on_tool_result<'a>(&'a self, _result: &'a ToolResult) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }

    fn on_model_reply<'a>(&'a self, _reply: &'a ModelMessage) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }

    fn on_model_error<'a>(&'a self, _error: &'a CompletionError) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }

    fn on_model_interrupt<'a>(&'a self) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChatObserver;

impl ChatObserver for NoopChatObserver {}
