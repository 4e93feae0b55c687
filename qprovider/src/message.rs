//! Conversation message variants and the shared envelope rules.
//!
//! Every variant carries the envelope fields `content`, optional sender
//! `name`, string `metadata`, and a unique `id`. Names are identifiers:
//! alphanumeric or underscore, 1 to 64 characters.
//!
//! ```rust
//! use qprovider::{Message, UserMessage};
//!
//! let message = UserMessage::new("What's the weather in Paris?")
//!     .with_name("traveler")
//!     .expect("name should validate");
//!
//! assert_eq!(Message::from(message).role().as_str(), "user");
//! ```

use std::fmt::{Display, Formatter};

use qcommon::MetadataMap;
use serde_json::{Map, Value};

use crate::{ConfigError, ConfigErrorKind};

/// Fixed id shared by every summary message.
pub const SUMMARY_MESSAGE_ID: &str = "SUMMARY";

/// Fixed sender name attached to summary messages.
pub const SUMMARY_MESSAGE_NAME: &str = "summary_of_previous_messages";

/// Validate a sender or tool name: alphanumeric/underscore, 1-64 chars.
pub fn validate_name(name: &str) -> Result<(), ConfigError> {
    let acceptable = !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_');

    if acceptable {
        Ok(())
    } else {
        Err(ConfigError::new(
            ConfigErrorKind::InvalidName,
            format!("name '{name}' must be alphanumeric/underscore and 1-64 characters"),
        ))
    }
}

fn fresh_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// The role tag a message carries on the completion wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    System,
    Assistant,
    Function,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
            Self::Assistant => "assistant",
            Self::Function => "function",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal status of a generation pass, with its wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinishReason {
    /// The full completion was generated.
    Done,
    /// The model is requesting a tool invocation.
    ToolUse,
    /// The token limit or maximum completion tokens was reached.
    LimitReached,
    /// Completion content omitted by a content filter.
    Filtered,
    /// The completion was cancelled by the user.
    Cancelled,
    /// The completion is still in progress or incomplete.
    #[default]
    Undefined,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Done => "stop",
            Self::ToolUse => "function_call",
            Self::LimitReached => "length",
            Self::Filtered => "content_filter",
            Self::Cancelled => "canceled",
            Self::Undefined => "null",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "stop" => Some(Self::Done),
            "function_call" => Some(Self::ToolUse),
            "length" => Some(Self::LimitReached),
            "content_filter" => Some(Self::Filtered),
            "canceled" => Some(Self::Cancelled),
            "null" => Some(Self::Undefined),
            _ => None,
        }
    }
}

impl Display for FinishReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message submitted by the end user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserMessage {
    pub content: String,
    pub name: Option<String>,
    pub metadata: MetadataMap,
    pub id: String,
}

impl UserMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: None,
            metadata: MetadataMap::new(),
            id: fresh_id(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = Some(name);
        Ok(self)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// An instruction message injected ahead of the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemMessage {
    pub content: String,
    pub name: Option<String>,
    pub metadata: MetadataMap,
    pub id: String,
}

impl SystemMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: None,
            metadata: MetadataMap::new(),
            id: fresh_id(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = Some(name);
        Ok(self)
    }
}

/// A synthesized digest of earlier history, injected by memory compaction.
///
/// Carries the fixed [`SUMMARY_MESSAGE_ID`] and back-references the newest
/// original message it covers so ordering survives compaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMessage {
    pub content: String,
    pub metadata: MetadataMap,
    pub id: String,
    pub last_message_id: Option<String>,
}

impl SummaryMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: MetadataMap::new(),
            id: SUMMARY_MESSAGE_ID.to_string(),
            last_message_id: None,
        }
    }

    pub fn with_last_message_id(mut self, last_message_id: impl Into<String>) -> Self {
        self.last_message_id = Some(last_message_id.into());
        self
    }

    pub fn name(&self) -> &'static str {
        SUMMARY_MESSAGE_NAME
    }
}

/// The conversational output of one tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub content: String,
    pub name: String,
    pub metadata: MetadataMap,
    pub id: String,
}

impl ToolResult {
    pub fn new(content: impl Into<String>, name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_name(&name)?;

        Ok(Self {
            content: content.into(),
            name,
            metadata: MetadataMap::new(),
            id: fresh_id(),
        })
    }
}

/// A model-generated reply with accounting attached by the completion client.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMessage {
    pub content: String,
    pub name: Option<String>,
    pub metadata: MetadataMap,
    pub id: String,
    pub finish_reason: FinishReason,
    pub prompt_tokens: u32,
    pub reply_tokens: u32,
    /// Cost of the generation pass, in USD.
    pub cost: f64,
}

impl ModelMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: None,
            metadata: MetadataMap::new(),
            id: fresh_id(),
            finish_reason: FinishReason::Undefined,
            prompt_tokens: 0,
            reply_tokens: 0,
            cost: 0.0,
        }
    }

    pub fn with_finish_reason(mut self, finish_reason: FinishReason) -> Self {
        self.finish_reason = finish_reason;
        self
    }

    pub fn with_usage(mut self, prompt_tokens: u32, reply_tokens: u32, cost: f64) -> Self {
        self.prompt_tokens = prompt_tokens;
        self.reply_tokens = reply_tokens;
        self.cost = cost;
        self
    }
}

/// A model-generated request to invoke a named tool.
///
/// `args_str` is the raw JSON argument string as generated by the model;
/// it is parsed lazily and an empty string reads as `{}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolUsage {
    pub tool_name: String,
    pub args_str: String,
    pub content: String,
    pub name: Option<String>,
    pub metadata: MetadataMap,
    pub id: String,
    pub finish_reason: FinishReason,
    pub prompt_tokens: u32,
    pub reply_tokens: u32,
    pub cost: f64,
}

impl ToolUsage {
    pub fn new(tool_name: impl Into<String>, args_str: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            args_str: args_str.into(),
            content: String::new(),
            name: None,
            metadata: MetadataMap::new(),
            id: fresh_id(),
            finish_reason: FinishReason::Undefined,
            prompt_tokens: 0,
            reply_tokens: 0,
            cost: 0.0,
        }
    }

    pub fn with_finish_reason(mut self, finish_reason: FinishReason) -> Self {
        self.finish_reason = finish_reason;
        self
    }

    pub fn with_usage(mut self, prompt_tokens: u32, reply_tokens: u32, cost: f64) -> Self {
        self.prompt_tokens = prompt_tokens;
        self.reply_tokens = reply_tokens;
        self.cost = cost;
        self
    }

    /// Parse the model-generated argument string as a JSON object.
    pub fn arguments(&self) -> serde_json::Result<Map<String, Value>> {
        let source = if self.args_str.is_empty() {
            "{}"
        } else {
            self.args_str.as_str()
        };

        serde_json::from_str(source)
    }
}

/// Any message that can appear in a conversation context.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    User(UserMessage),
    System(SystemMessage),
    Summary(SummaryMessage),
    ToolResult(ToolResult),
    Model(ModelMessage),
    ToolUsage(ToolUsage),
}

impl Message {
    pub fn role(&self) -> Role {
        match self {
            Self::User(_) => Role::User,
            Self::System(_) | Self::Summary(_) => Role::System,
            Self::ToolResult(_) => Role::Function,
            Self::Model(_) | Self::ToolUsage(_) => Role::Assistant,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::User(message) => &message.content,
            Self::System(message) => &message.content,
            Self::Summary(message) => &message.content,
            Self::ToolResult(message) => &message.content,
            Self::Model(message) => &message.content,
            Self::ToolUsage(message) => &message.content,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::User(message) => message.name.as_deref(),
            Self::System(message) => message.name.as_deref(),
            Self::Summary(message) => Some(message.name()),
            Self::ToolResult(message) => Some(message.name.as_str()),
            Self::Model(message) => message.name.as_deref(),
            Self::ToolUsage(message) => message.name.as_deref(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::User(message) => &message.id,
            Self::System(message) => &message.id,
            Self::Summary(message) => &message.id,
            Self::ToolResult(message) => &message.id,
            Self::Model(message) => &message.id,
            Self::ToolUsage(message) => &message.id,
        }
    }

    pub fn metadata(&self) -> &MetadataMap {
        match self {
            Self::User(message) => &message.metadata,
            Self::System(message) => &message.metadata,
            Self::Summary(message) => &message.metadata,
            Self::ToolResult(message) => &message.metadata,
            Self::Model(message) => &message.metadata,
            Self::ToolUsage(message) => &message.metadata,
        }
    }
}

impl From<UserMessage> for Message {
    fn from(value: UserMessage) -> Self {
        Self::User(value)
    }
}

impl From<SystemMessage> for Message {
    fn from(value: SystemMessage) -> Self {
        Self::System(value)
    }
}

impl From<SummaryMessage> for Message {
    fn from(value: SummaryMessage) -> Self {
        Self::Summary(value)
    }
}

impl From<ToolResult> for Message {
    fn from(value: ToolResult) -> Self {
        Self::ToolResult(value)
    }
}

impl From<ModelMessage> for Message {
    fn from(value: ModelMessage) -> Self {
        Self::Model(value)
    }
}

impl From<ToolUsage> for Message {
    fn from(value: ToolUsage) -> Self {
        Self::ToolUsage(value)
    }
}

/// What a single generation pass produces: a reply or a tool request.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Reply(ModelMessage),
    ToolUse(ToolUsage),
}

impl ModelOutput {
    pub fn finish_reason(&self) -> FinishReason {
        match self {
            Self::Reply(message) => message.finish_reason,
            Self::ToolUse(usage) => usage.finish_reason,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Reply(message) => &message.content,
            Self::ToolUse(usage) => &usage.content,
        }
    }

    pub fn is_tool_use(&self) -> bool {
        matches!(self, Self::ToolUse(_))
    }
}

impl From<ModelOutput> for Message {
    fn from(value: ModelOutput) -> Self {
        match value {
            ModelOutput::Reply(message) => Self::Model(message),
            ModelOutput::ToolUse(usage) => Self::ToolUsage(usage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_must_be_identifier_like() {
        assert!(UserMessage::new("hi").with_name("a b").is_err());
        assert!(UserMessage::new("hi").with_name("").is_err());
        assert!(UserMessage::new("hi").with_name("x".repeat(65)).is_err());

        let named = UserMessage::new("hi").with_name("tool_1").expect("valid");
        assert_eq!(named.name.as_deref(), Some("tool_1"));
        assert_eq!(UserMessage::new("hi").name, None);
    }

    #[test]
    fn tool_results_require_a_tool_name() {
        assert!(ToolResult::new("18C", "weather lookup").is_err());

        let result = ToolResult::new("18C", "weather").expect("valid name");
        assert_eq!(Message::from(result).role(), Role::Function);
    }

    #[test]
    fn summary_messages_carry_fixed_identity() {
        let summary = SummaryMessage::new("earlier chat").with_last_message_id("m42");

        assert_eq!(summary.id, SUMMARY_MESSAGE_ID);
        assert_eq!(summary.name(), SUMMARY_MESSAGE_NAME);
        assert_eq!(summary.last_message_id.as_deref(), Some("m42"));

        let message = Message::from(summary);
        assert_eq!(message.role(), Role::System);
        assert_eq!(message.name(), Some(SUMMARY_MESSAGE_NAME));
    }

    #[test]
    fn message_ids_are_unique_per_construction() {
        let first = UserMessage::new("one");
        let second = UserMessage::new("one");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn tool_usage_arguments_parse_lazily() {
        let usage = ToolUsage::new("weather", "{\"city\":\"Paris\"}");
        let args = usage.arguments().expect("object should parse");
        assert_eq!(args.get("city").and_then(|v| v.as_str()), Some("Paris"));

        let empty = ToolUsage::new("weather", "");
        assert!(empty.arguments().expect("empty reads as {}").is_empty());

        let broken = ToolUsage::new("weather", "{nope");
        assert!(broken.arguments().is_err());
    }

    #[test]
    fn finish_reason_wire_codes_round_trip() {
        for reason in [
            FinishReason::Done,
            FinishReason::ToolUse,
            FinishReason::LimitReached,
            FinishReason::Filtered,
            FinishReason::Cancelled,
            FinishReason::Undefined,
        ] {
            assert_eq!(FinishReason::parse(reason.as_str()), Some(reason));
        }

        assert_eq!(FinishReason::parse("unheard_of"), None);
        assert_eq!(FinishReason::default(), FinishReason::Undefined);
    }

    #[test]
    fn model_output_converts_into_context_message() {
        let reply = ModelOutput::Reply(ModelMessage::new("done").with_finish_reason(FinishReason::Done));
        assert!(!reply.is_tool_use());
        assert_eq!(reply.finish_reason(), FinishReason::Done);
        assert_eq!(Message::from(reply).role(), Role::Assistant);

        let usage = ModelOutput::ToolUse(ToolUsage::new("weather", "{}"));
        assert!(usage.is_tool_use());
        assert_eq!(Message::from(usage).role(), Role::Assistant);
    }
}
