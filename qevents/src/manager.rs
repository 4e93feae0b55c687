//! Sequential broadcast of lifecycle events to registered observers.

use std::sync::Arc;

use qprovider::{
    CompletionError, Message, ModelConfig, ModelMessage, ModelOutput, ToolResult, ToolSpec,
    ToolUsage,
};

use crate::ChatObserver;

/// Broadcasts each event to observers in list order, awaiting every dispatch
/// to completion before the next so side effects stay deterministic.
///
/// The observer list is fixed at construction; it is only read during
/// dispatch.
#[derive(Clone, Default)]
pub struct EventsManager {
    observers: Vec<Arc<dyn ChatObserver>>,
}

impl EventsManager {
    pub fn new(observers: Vec<Arc<dyn ChatObserver>>) -> Self {
        Self { observers }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub async fn trigger_model_start(
        &self,
        config: &ModelConfig,
        context: &[Message],
        tools: &[ToolSpec],
    ) {
        for observer in &self.observers {
            observer.on_model_start(config, context, tools).await;
        }
    }

    pub async fn trigger_model_generation(&self, packet: &ModelOutput) {
        for observer in &self.observers {
            observer.on_model_generation(packet).await;
        }
    }

    pub async fn trigger_model_end(&self, message: &ModelOutput) {
        for observer in &self.observers {
            observer.on_model_end(message).await;
        }
    }

    pub async fn trigger_tool_use(&self, usage: &ToolUsage) {
        for observer in &self.observers {
            observer.on_tool_use(usage).await;
        }
    }

    pub async fn trigger_tool_result(&self, result: &ToolResult) {
        for observer in &self.observers {
            observer.on_tool_result(result).await;
        }
    }

    pub async fn trigger_model_reply(&self, reply: &ModelMessage) {
        for observer in &self.observers {
            observer.on_model_reply(reply).await;
        }
    }

    pub async fn trigger_model_error(&self, error: &CompletionError) {
        for observer in &self.observers {
            observer.on_model_error(error).await;
        }
    }

    pub async fn trigger_model_interrupt(&self) {
        for observer in &self.observers {
            observer.on_model_interrupt().await;
        }
    }
}
