//! Streaming completion event contracts and in-memory stream utilities.
//!
//! ```rust
//! use qprovider::{BoxedCompletionStream, CompletionEvent, ModelMessage, ModelOutput, VecCompletionStream};
//!
//! let stream = VecCompletionStream::new(vec![Ok(CompletionEvent::Packet(
//!     ModelOutput::Reply(ModelMessage::new("hel")),
//! ))]);
//! let _boxed: BoxedCompletionStream<'static> = Box::pin(stream);
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::{CompletionError, ModelOutput};

#[derive(Debug, Clone, PartialEq)]
pub enum CompletionEvent {
    /// A streamed partial of the message being generated.
    Packet(ModelOutput),
    /// The terminal message of the pass, carrying finish reason and
    /// accounting.
    Finished(ModelOutput),
}

/// Completion stream contract.
///
/// Invariants for consumers:
/// - Events arrive in source order.
/// - `Packet` may appear zero or more times.
/// - A successful stream ends with exactly one `Finished`, after all packets.
/// - Once the stream yields `None`, it must not yield additional items.
pub trait CompletionEventStream:
    Stream<Item = Result<CompletionEvent, CompletionError>> + Send
{
}

impl<T> CompletionEventStream for T where
    T: Stream<Item = Result<CompletionEvent, CompletionError>> + Send
{
}

pub type BoxedCompletionStream<'a> = Pin<Box<dyn CompletionEventStream + 'a>>;

#[derive(Debug)]
pub struct VecCompletionStream {
    events: VecDeque<Result<CompletionEvent, CompletionError>>,
}

impl VecCompletionStream {
    pub fn new(events: Vec<Result<CompletionEvent, CompletionError>>) -> Self {
        Self {
            events: events.into(),
        }
    }
}

impl Stream for VecCompletionStream {
    type Item = Result<CompletionEvent, CompletionError>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<CompletionEvent, CompletionError>>> {
        Poll::Ready(self.events.pop_front())
    }
}
