//! Conversation memory contract and a basic in-memory implementation.
//!
//! Memory owns the ordered, append-only history of one conversation. Any
//! context-window compaction (e.g. injecting a summary message) happens
//! behind this boundary; the loop only ever sees the current ordered view.

use std::sync::Mutex;

use qcommon::BoxFuture;
use qprovider::Message;

use crate::ChatError;

pub type ChatFuture<'a, T> = BoxFuture<'a, T>;

pub trait ConversationMemory: Send + Sync {
    fn append<'a>(&'a self, message: Message) -> ChatFuture<'a, Result<(), ChatError>>;

    fn ordered_context<'a>(&'a self) -> ChatFuture<'a, Result<Vec<Message>, ChatError>>;
}

#[derive(Debug, Default)]
pub struct InMemoryConversationMemory {
    messages: Mutex<Vec<Message>>,
}

impl InMemoryConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationMemory for InMemoryConversationMemory {
    fn append<'a>(&'a self, message: Message) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            let mut messages = self
                .messages
                .lock()
                .map_err(|_| ChatError::memory("conversation memory lock poisoned"))?;

            messages.push(message);
            Ok(())
        })
    }

    fn ordered_context<'a>(&'a self) -> ChatFuture<'a, Result<Vec<Message>, ChatError>> {
        Box::pin(async move {
            let messages = self
                .messages
                .lock()
                .map_err(|_| ChatError::memory("conversation memory lock poisoned"))?;

            Ok(messages.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use qprovider::UserMessage;

    use super::*;

    #[tokio::test]
    async fn appends_preserve_insertion_order() {
        let memory = InMemoryConversationMemory::new();

        memory
            .append(Message::from(UserMessage::new("first")))
            .await
            .expect("append should work");
        memory
            .append(Message::from(UserMessage::new("second")))
            .await
            .expect("append should work");

        let context = memory.ordered_context().await.expect("context should load");
        assert_eq!(context.len(), 2);
        assert_eq!(context[0].content(), "first");
        assert_eq!(context[1].content(), "second");
    }
}
