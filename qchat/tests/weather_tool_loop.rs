use std::sync::{Arc, Mutex};

use qchat::prelude::*;
use qcommon::BoxFuture;
use qprovider::{
    BoxedCompletionStream, ChatModelSpec, ClientFuture, CompletionError, CompletionEvent,
    CompletionRequest, FinishReason, Message, ModelConfig, ModelMessage, ModelOutput,
    ToolParameter, ToolResult, ToolSpec, ToolUsage, UserMessage, VecCompletionStream,
};

/// Streams three content packets, requests the weather tool, then answers
/// once the tool result is in context.
struct WeatherClient {
    calls: Mutex<u32>,
}

impl qprovider::CompletionClient for WeatherClient {
    fn stream<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> ClientFuture<'a, Result<BoxedCompletionStream<'a>, CompletionError>> {
        Box::pin(async move {
            let mut calls = self.calls.lock().expect("calls lock");
            *calls += 1;

            let events = if *calls == 1 {
                assert!(request.tools.iter().any(|tool| tool.name == "weather"));
                vec![
                    Ok(CompletionEvent::Packet(ModelOutput::Reply(
                        ModelMessage::new("Let"),
                    ))),
                    Ok(CompletionEvent::Packet(ModelOutput::Reply(
                        ModelMessage::new(" me"),
                    ))),
                    Ok(CompletionEvent::Packet(ModelOutput::Reply(
                        ModelMessage::new(" check"),
                    ))),
                    Ok(CompletionEvent::Finished(ModelOutput::ToolUse(
                        ToolUsage::new("weather", "{\"city\":\"Paris\"}")
                            .with_finish_reason(FinishReason::ToolUse)
                            .with_usage(42, 9, 0.000081),
                    ))),
                ]
            } else {
                assert!(
                    request
                        .context
                        .iter()
                        .any(|message| message.content() == "18°C, cloudy"),
                    "tool result should be part of the follow-up context"
                );
                vec![Ok(CompletionEvent::Finished(ModelOutput::Reply(
                    ModelMessage::new("It's 18°C and cloudy in Paris.")
                        .with_finish_reason(FinishReason::Done)
                        .with_usage(64, 11, 0.000118),
                )))]
            };

            Ok(Box::pin(VecCompletionStream::new(events)) as BoxedCompletionStream<'a>)
        })
    }
}

#[derive(Default)]
struct EventTrace {
    names: Mutex<Vec<String>>,
}

impl EventTrace {
    fn names(&self) -> Vec<String> {
        self.names.lock().expect("names lock").clone()
    }
}

struct TracingAll {
    trace: Arc<EventTrace>,
}

impl TracingAll {
    fn push(&self, name: &str) {
        self.trace
            .names
            .lock()
            .expect("names lock")
            .push(name.to_string());
    }
}

impl ChatObserver for TracingAll {
    fn on_model_start<'a>(
        &'a self,
        _config: &'a ModelConfig,
        _context: &'a [Message],
        _tools: &'a [ToolSpec],
    ) -> BoxFuture<'a, ()> {
        Box::pin(async { self.push("model_start") })
    }

    fn on_model_generation<'a>(&'a self, _packet: &'a ModelOutput) -> BoxFuture<'a, ()> {
        Box::pin(async { self.push("model_generation") })
    }

    fn on_model_end<'a>(&'a self, _message: &'a ModelOutput) -> BoxFuture<'a, ()> {
        Box::pin(async { self.push("model_end") })
    }

    fn on_tool_use<'a>(&'a self, _usage: &'a ToolUsage) -> BoxFuture<'a, ()> {
        Box::pin(async { self.push("tool_use") })
    }

    fn on_tool_result<'a>(&'a self, _result: &'a ToolResult) -> BoxFuture<'a, ()> {
        Box::pin(async { self.push("tool_result") })
    }

    fn on_model_reply<'a>(&'a self, _reply: &'a ModelMessage) -> BoxFuture<'a, ()> {
        Box::pin(async { self.push("model_reply") })
    }
}

fn weather_tool() -> Arc<dyn Tool> {
    let city = ToolParameter::new("string", "city").expect("param");
    let spec = ToolSpec::new("weather", "Current weather for a city", vec![city]).expect("spec");

    Arc::new(FunctionTool::new(spec, |args| async move {
        match args.get("city").and_then(serde_json::Value::as_str) {
            Some("Paris") => Ok("18°C, cloudy".to_string()),
            Some(other) => Ok(format!("no data for {other}")),
            None => Err(ToolError::execution("city missing")),
        }
    }))
}

#[tokio::test]
async fn weather_question_runs_the_full_tool_loop() {
    let trace = Arc::new(EventTrace::default());
    let engine = ChatEngine::builder(Arc::new(WeatherClient {
        calls: Mutex::new(0),
    }))
    .tool(weather_tool())
    .observer(Arc::new(TracingAll {
        trace: trace.clone(),
    }))
    .build()
    .expect("engine should build");

    let config = ModelConfig::new(ChatModelSpec::chatgpt());
    let reply = engine
        .run(&config, UserMessage::new("What's the weather in Paris?"))
        .await
        .expect("run should succeed")
        .expect("reply should be produced");

    assert_eq!(reply.content, "It's 18°C and cloudy in Paris.");
    assert_eq!(reply.finish_reason, FinishReason::Done);

    assert_eq!(
        trace.names(),
        vec![
            "model_start",
            "model_generation",
            "model_generation",
            "model_generation",
            "model_end",
            "tool_use",
            "tool_result",
            "model_end",
            "model_reply",
        ]
    );

    let context = engine
        .memory()
        .ordered_context()
        .await
        .expect("context should load");
    assert_eq!(context.len(), 4);
    assert_eq!(context[0].content(), "What's the weather in Paris?");
    assert!(matches!(&context[1], Message::ToolUsage(usage) if usage.tool_name == "weather"));
    assert_eq!(context[2].content(), "18°C, cloudy");
    assert_eq!(context[3].content(), "It's 18°C and cloudy in Paris.");
}
