//! Tracing-based observer for generation-loop lifecycle events.
//!
//! ```rust
//! use qevents::ChatObserver;
//! use qobserve::TracingChatObserver;
//!
//! fn accepts_observer(_observer: &dyn ChatObserver) {}
//!
//! let observer = TracingChatObserver;
//! accepts_observer(&observer);
//! ```

use qcommon::BoxFuture;
use qevents::ChatObserver;
use qprovider::{
    CompletionError, Message, ModelConfig, ModelMessage, ModelOutput, ToolResult, ToolSpec,
    ToolUsage,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingChatObserver;

impl ChatObserver for TracingChatObserver {
    fn on_model_start<'a>(
        &'a self,
        config: &'a ModelConfig,
        context: &'a [Message],
        tools: &'a [ToolSpec],
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            tracing::info!(
                phase = "model",
                event = "start",
                model = %config.chat_model.name,
                streaming = config.streaming,
                context_len = context.len(),
                tools = tools.len()
            );
        })
    }

    fn on_model_generation<'a>(&'a self, packet: &'a ModelOutput) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            tracing::trace!(
                phase = "model",
                event = "generation",
                packet_len = packet.content().len()
            );
        })
    }

    fn on_model_end<'a>(&'a self, message: &'a ModelOutput) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            tracing::info!(
                phase = "model",
                event = "end",
                finish_reason = %message.finish_reason(),
                tool_use = message.is_tool_use()
            );
        })
    }

    fn on_tool_use<'a>(&'a self, usage: &'a ToolUsage) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            tracing::info!(
                phase = "tool",
                event = "use",
                tool_name = usage.tool_name,
                args_len = usage.args_str.len()
            );
        })
    }

    fn on_tool_result<'a>(&'a self, result: &'a ToolResult) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            tracing::info!(
                phase = "tool",
                event = "result",
                tool_name = result.name,
                result_len = result.content.len()
            );
        })
    }

    fn on_model_reply<'a>(&'a self, reply: &'a ModelMessage) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            tracing::info!(
                phase = "model",
                event = "reply",
                finish_reason = %reply.finish_reason,
                prompt_tokens = reply.prompt_tokens,
                reply_tokens = reply.reply_tokens,
                cost_usd = reply.cost
            );
        })
    }

    fn on_model_error<'a>(&'a self, error: &'a CompletionError) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            tracing::error!(
                phase = "model",
                event = "error",
                error_kind = ?error.kind,
                retryable = error.retryable,
                error = %error
            );
        })
    }

    fn on_model_interrupt<'a>(&'a self) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            tracing::warn!(phase = "model", event = "interrupt");
        })
    }
}
