//! Completion-client boundary consumed by the generation loop.

use std::future::Future;
use std::pin::Pin;

use crate::{BoxedCompletionStream, CompletionError, Message, ModelConfig, ToolSpec};

pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One generation pass worth of input: configuration, ordered context, and
/// the tool declarations the model may call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub config: ModelConfig,
    pub context: Vec<Message>,
    pub tools: Vec<ToolSpec>,
}

impl CompletionRequest {
    pub fn new(config: ModelConfig, context: Vec<Message>) -> Self {
        Self {
            config,
            context,
            tools: Vec::new(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }
}

/// A streaming completion backend.
///
/// Implementations own transport, timeouts, and accounting: the terminal
/// message of a successful stream carries the finish reason, token counts,
/// and cost. Cooperative cancellation is the caller's concern; dropping the
/// stream abandons the request.
pub trait CompletionClient: Send + Sync {
    fn stream<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> ClientFuture<'a, Result<BoxedCompletionStream<'a>, CompletionError>>;
}
