use qcommon::SessionId;
use qevents::ChatObserver;
use qprovider::{
    ChatModelSpec, CompletionError, FinishReason, Message, ModelConfig, ModelMessage, ModelOutput,
    ToolResult, ToolUsage, UserMessage,
};

use crate::{MetricsChatObserver, TracingChatObserver};

fn config() -> ModelConfig {
    ModelConfig::new(ChatModelSpec::chatgpt())
}

fn context() -> Vec<Message> {
    vec![Message::from(UserMessage::new("hello"))]
}

#[tokio::test]
async fn tracing_observer_smoke_test_all_callbacks() {
    let observer = TracingChatObserver;
    let reply = ModelMessage::new("done").with_finish_reason(FinishReason::Done);
    let usage = ToolUsage::new("weather", "{\"city\":\"Paris\"}");
    let result = ToolResult::new("18C", "weather").expect("valid name");

    observer.on_model_start(&config(), &context(), &[]).await;
    observer
        .on_model_generation(&ModelOutput::Reply(ModelMessage::new("do")))
        .await;
    observer
        .on_model_end(&ModelOutput::ToolUse(usage.clone()))
        .await;
    observer.on_tool_use(&usage).await;
    observer.on_tool_result(&result).await;
    observer.on_model_reply(&reply).await;
    observer
        .on_model_error(&CompletionError::connection("reset"))
        .await;
    observer.on_model_interrupt().await;
}

#[tokio::test]
async fn metrics_observer_accumulates_reported_usage() {
    let observer = MetricsChatObserver::new(SessionId::from("session-1"));
    observer.on_model_start(&config(), &context(), &[]).await;

    // costs consistent with the chatgpt preset rates
    observer
        .on_model_end(&ModelOutput::ToolUse(
            ToolUsage::new("weather", "{}")
                .with_finish_reason(FinishReason::ToolUse)
                .with_usage(1000, 500, 0.0025),
        ))
        .await;
    observer
        .on_model_end(&ModelOutput::Reply(
            ModelMessage::new("done")
                .with_finish_reason(FinishReason::Done)
                .with_usage(2000, 1000, 0.005),
        ))
        .await;

    let totals = observer.totals();
    assert_eq!(totals.prompt_tokens, 3000);
    assert_eq!(totals.reply_tokens, 1500);
    assert!((totals.cost - 0.0075).abs() < 1e-9);
}

#[tokio::test]
async fn metrics_observer_tolerates_mismatched_cost_reports() {
    let observer = MetricsChatObserver::new(SessionId::from("session-2"));
    observer.on_model_start(&config(), &context(), &[]).await;

    // reported cost is far from the configured rates; only a warning fires
    observer
        .on_model_end(&ModelOutput::Reply(
            ModelMessage::new("done")
                .with_finish_reason(FinishReason::Done)
                .with_usage(1000, 1000, 9.99),
        ))
        .await;

    let totals = observer.totals();
    assert_eq!(totals.prompt_tokens, 1000);
    assert!((totals.cost - 9.99).abs() < 1e-9);
}

#[tokio::test]
async fn metrics_observer_ignores_passes_without_reported_tokens() {
    let observer = MetricsChatObserver::new(SessionId::from("session-3"));
    observer.on_model_start(&config(), &context(), &[]).await;

    observer
        .on_model_end(&ModelOutput::Reply(
            ModelMessage::new("partial").with_finish_reason(FinishReason::Cancelled),
        ))
        .await;

    assert_eq!(observer.totals(), crate::UsageTotals::default());
}
