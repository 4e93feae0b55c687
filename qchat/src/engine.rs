//! Event-driven generation loop over a streaming completion client.

use std::pin::pin;
use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::future::{Either, select};
use qevents::{ChatObserver, EventsManager};
use qprovider::{
    CompletionClient, CompletionError, CompletionEvent, CompletionRequest, FinishReason, Message,
    ModelConfig, ModelMessage, ModelOutput, ToolSpec, UserMessage,
};
use qtooling::{Tool, ToolsManager};
use tokio_util::sync::CancellationToken;

use crate::{ChatError, ConversationMemory, InMemoryConversationMemory};

pub struct ChatEngineBuilder {
    client: Arc<dyn CompletionClient>,
    memory: Option<Arc<dyn ConversationMemory>>,
    tools: Vec<Arc<dyn Tool>>,
    observers: Vec<Arc<dyn ChatObserver>>,
}

impl ChatEngineBuilder {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            memory: None,
            tools: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn memory(mut self, memory: Arc<dyn ConversationMemory>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ChatObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn observers(mut self, observers: Vec<Arc<dyn ChatObserver>>) -> Self {
        self.observers.extend(observers);
        self
    }

    pub fn build(self) -> Result<ChatEngine, ChatError> {
        let memory = self
            .memory
            .unwrap_or_else(|| Arc::new(InMemoryConversationMemory::new()));

        Ok(ChatEngine {
            client: self.client,
            memory,
            tools: ToolsManager::new(self.tools)?,
            events: EventsManager::new(self.observers),
        })
    }
}

/// Orchestrates generation passes for one conversation.
///
/// Single-flight: at most one generation pass and one tool execution run at a
/// time per engine; callers serialize `run` invocations per conversation.
/// Memory is appended to by this loop only and is never rolled back.
pub struct ChatEngine {
    client: Arc<dyn CompletionClient>,
    memory: Arc<dyn ConversationMemory>,
    tools: ToolsManager,
    events: EventsManager,
}

/// Outcome of one generation pass, with cancellation kept structurally
/// distinct from failure.
enum PassOutcome {
    Finished(ModelOutput),
    Cancelled { partial: Option<ModelMessage> },
    Failed(CompletionError),
}

impl ChatEngine {
    pub fn builder(client: Arc<dyn CompletionClient>) -> ChatEngineBuilder {
        ChatEngineBuilder::new(client)
    }

    pub fn memory(&self) -> Arc<dyn ConversationMemory> {
        Arc::clone(&self.memory)
    }

    pub fn tools(&self) -> &ToolsManager {
        &self.tools
    }

    /// Generate a reply to a new user message.
    pub async fn run(
        &self,
        config: &ModelConfig,
        message: UserMessage,
    ) -> Result<Option<ModelMessage>, ChatError> {
        self.run_cancellable(config, message, CancellationToken::new())
            .await
    }

    /// Generate a reply, honoring cooperative cancellation at every suspend
    /// point.
    ///
    /// Returns `Ok(None)` when interrupted; exactly one `model_interrupt`
    /// event fires on that path and already-appended memory is retained. A
    /// completion failure fires `model_error` and surfaces as `Err`.
    pub async fn run_cancellable(
        &self,
        config: &ModelConfig,
        message: UserMessage,
        cancel: CancellationToken,
    ) -> Result<Option<ModelMessage>, ChatError> {
        config.validate()?;
        let declarations = config.permitted_tools(&self.tools.specs());

        self.memory.append(Message::from(message)).await?;
        let context = self.full_context(config).await?;
        self.events
            .trigger_model_start(config, &context, &declarations)
            .await;

        loop {
            let context = self.full_context(config).await?;
            let output = match self
                .generate(config, context, &declarations, &cancel)
                .await
            {
                PassOutcome::Failed(error) => {
                    self.events.trigger_model_error(&error).await;
                    return Err(ChatError::from(error));
                }
                PassOutcome::Cancelled { partial } => {
                    if let Some(partial) = partial {
                        self.memory.append(Message::from(partial)).await?;
                    }
                    self.events.trigger_model_interrupt().await;
                    return Ok(None);
                }
                PassOutcome::Finished(output) => output,
            };

            self.memory.append(Message::from(output.clone())).await?;
            self.events.trigger_model_end(&output).await;

            match output {
                ModelOutput::ToolUse(usage) if !cancel.is_cancelled() => {
                    self.events.trigger_tool_use(&usage).await;
                    match self.tools.use_tool(&usage, &cancel).await {
                        Some(result) => {
                            self.events.trigger_tool_result(&result).await;
                            self.memory.append(Message::from(result)).await?;
                        }
                        None => {
                            self.events.trigger_model_interrupt().await;
                            return Ok(None);
                        }
                    }
                }
                ModelOutput::ToolUse(_) => {
                    self.events.trigger_model_interrupt().await;
                    return Ok(None);
                }
                ModelOutput::Reply(reply) => {
                    self.events.trigger_model_reply(&reply).await;
                    return Ok(Some(reply));
                }
            }
        }
    }

    /// The configured prompt, when present, followed by memory's ordered view.
    async fn full_context(&self, config: &ModelConfig) -> Result<Vec<Message>, ChatError> {
        let mut context = Vec::new();
        if let Some(prompt) = &config.prompt {
            context.push(Message::from(prompt.clone()));
        }

        context.extend(self.memory.ordered_context().await?);
        Ok(context)
    }

    /// Drive one streaming completion pass, forwarding each packet as a
    /// generation event and racing every suspend point against cancellation.
    async fn generate(
        &self,
        config: &ModelConfig,
        context: Vec<Message>,
        declarations: &[ToolSpec],
        cancel: &CancellationToken,
    ) -> PassOutcome {
        let request =
            CompletionRequest::new(config.clone(), context).with_tools(declarations.to_vec());

        let opened = match select(pin!(cancel.cancelled()), self.client.stream(request)).await {
            Either::Left(_) => return PassOutcome::Cancelled { partial: None },
            Either::Right((opened, _)) => opened,
        };

        let mut stream = match opened {
            Ok(stream) => stream,
            Err(error) => return PassOutcome::Failed(error),
        };

        let mut received = String::new();
        loop {
            let item = match select(pin!(cancel.cancelled()), stream.next()).await {
                Either::Left(_) => {
                    let partial = (!received.is_empty()).then(|| {
                        ModelMessage::new(received.clone())
                            .with_finish_reason(FinishReason::Cancelled)
                    });
                    return PassOutcome::Cancelled { partial };
                }
                Either::Right((item, _)) => item,
            };

            match item {
                Some(Ok(CompletionEvent::Packet(packet))) => {
                    received.push_str(packet.content());
                    self.events.trigger_model_generation(&packet).await;
                }
                Some(Ok(CompletionEvent::Finished(output))) => {
                    return PassOutcome::Finished(output);
                }
                Some(Err(error)) => return PassOutcome::Failed(error),
                None => {
                    return PassOutcome::Failed(CompletionError::connection(
                        "stream ended without a terminal message",
                    ));
                }
            }
        }
    }
}
