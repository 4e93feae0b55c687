//! Production-friendly observers for generation-loop lifecycle events.
//!
//! ```rust
//! use qcommon::SessionId;
//! use qobserve::{MetricsChatObserver, TracingChatObserver};
//!
//! let _tracing = TracingChatObserver;
//! let _metrics = MetricsChatObserver::new(SessionId::from("session-1"));
//! ```

mod metrics_observer;
mod tracing_observer;

pub use metrics_observer::{MetricsChatObserver, UsageTotals};
pub use tracing_observer::TracingChatObserver;

pub mod prelude {
    pub use crate::{MetricsChatObserver, TracingChatObserver, UsageTotals};
}

#[cfg(test)]
mod tests;
