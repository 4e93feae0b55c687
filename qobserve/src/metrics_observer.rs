//! Metrics-based observer accumulating per-session token and cost usage.

use std::sync::Mutex;

use qcommon::{BoxFuture, SessionId};
use qevents::ChatObserver;
use qprovider::{Message, ModelConfig, ModelOutput, ToolSpec};

/// Reported costs within this margin of the recomputed value pass the
/// consistency check.
const COST_MISMATCH_EPSILON: f64 = 0.0005;

/// Accumulated usage reported by the completion client for one session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UsageTotals {
    pub prompt_tokens: u64,
    pub reply_tokens: u64,
    pub cost: f64,
}

#[derive(Debug, Default)]
struct MetricsState {
    model_name: String,
    input_cost: f64,
    output_cost: f64,
    totals: UsageTotals,
}

/// Accumulates token counts and cost per generation pass, attributed to an
/// explicit session id.
///
/// The client-reported cost is cross-checked against the configured per-1k
/// rates; divergence is logged and never fatal. Billing truth stays with the
/// completion client.
pub struct MetricsChatObserver {
    session_id: SessionId,
    state: Mutex<MetricsState>,
}

impl MetricsChatObserver {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            state: Mutex::new(MetricsState::default()),
        }
    }

    pub fn totals(&self) -> UsageTotals {
        self.state
            .lock()
            .map(|state| state.totals)
            .unwrap_or_default()
    }
}

impl ChatObserver for MetricsChatObserver {
    fn on_model_start<'a>(
        &'a self,
        config: &'a ModelConfig,
        _context: &'a [Message],
        _tools: &'a [ToolSpec],
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            if let Ok(mut state) = self.state.lock() {
                state.model_name = config.chat_model.name.clone();
                state.input_cost = config.chat_model.input_cost;
                state.output_cost = config.chat_model.output_cost;
            }
        })
    }

    fn on_model_end<'a>(&'a self, message: &'a ModelOutput) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let (prompt_tokens, reply_tokens, cost) = match message {
                ModelOutput::Reply(reply) => (reply.prompt_tokens, reply.reply_tokens, reply.cost),
                ModelOutput::ToolUse(usage) => {
                    (usage.prompt_tokens, usage.reply_tokens, usage.cost)
                }
            };

            let Ok(mut state) = self.state.lock() else {
                return;
            };

            state.totals.prompt_tokens += u64::from(prompt_tokens);
            state.totals.reply_tokens += u64::from(reply_tokens);
            state.totals.cost += cost;

            metrics::counter!(
                "quill_model_prompt_tokens_total",
                "session" => self.session_id.to_string(),
                "model" => state.model_name.clone()
            )
            .increment(u64::from(prompt_tokens));
            metrics::counter!(
                "quill_model_reply_tokens_total",
                "session" => self.session_id.to_string(),
                "model" => state.model_name.clone()
            )
            .increment(u64::from(reply_tokens));
            metrics::histogram!(
                "quill_model_pass_cost_usd",
                "session" => self.session_id.to_string(),
                "model" => state.model_name.clone()
            )
            .record(cost);

            // consistency check only; the reported value stays authoritative
            if prompt_tokens > 0 || reply_tokens > 0 {
                let expected = f64::from(prompt_tokens) / 1000.0 * state.input_cost
                    + f64::from(reply_tokens) / 1000.0 * state.output_cost;

                if (expected - cost).abs() > COST_MISMATCH_EPSILON {
                    tracing::warn!(
                        phase = "metrics",
                        event = "cost_mismatch",
                        session_id = %self.session_id,
                        model = state.model_name,
                        reported_cost = cost,
                        computed_cost = expected
                    );
                }
            }
        })
    }
}
