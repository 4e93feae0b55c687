//! Blob codec wiring for every persistable variant in this crate.
//!
//! Variants register under their concrete type names at startup; tags are
//! collision-free across the whole set.
//!
//! ```rust
//! use qcodec::serialize;
//! use qprovider::{UserMessage, codec};
//!
//! let registry = codec();
//! let message = UserMessage::new("hello");
//!
//! let decoded = registry
//!     .decode(&serialize(&message))
//!     .expect("decode should work")
//!     .into_message()
//!     .expect("blob holds a message");
//! assert_eq!(decoded.content(), "hello");
//! ```

use qcodec::{CodecRegistry, DecodeError, Params, Serializable, params, parse_blob};
use qcommon::MetadataMap;
use serde_json::Value;

use crate::{
    ChatModelSpec, FinishReason, Message, ModelConfig, ModelMessage, SummaryMessage,
    SystemMessage, ToolParameter, ToolResult, ToolSpec, ToolUsage, UserMessage, validate_name,
};

fn envelope_params(
    content: &str,
    name: Option<&str>,
    metadata: &MetadataMap,
    id: &str,
) -> Params {
    let mut fields = Params::new();
    fields.insert("content".to_string(), Value::String(content.to_string()));
    fields.insert("name".to_string(), params::encode_opt_string(name));
    fields.insert(
        "metadata".to_string(),
        params::encode_string_map(metadata.iter()),
    );
    fields.insert("id".to_string(), Value::String(id.to_string()));
    fields
}

fn accounting_params(
    fields: &mut Params,
    finish_reason: FinishReason,
    prompt_tokens: u32,
    reply_tokens: u32,
    cost: f64,
) {
    fields.insert(
        "finish_reason".to_string(),
        Value::String(finish_reason.as_str().to_string()),
    );
    fields.insert("prompt_tokens".to_string(), Value::from(prompt_tokens));
    fields.insert("reply_tokens".to_string(), Value::from(reply_tokens));
    fields.insert("cost".to_string(), Value::from(cost));
}

impl Serializable for UserMessage {
    fn type_tag(&self) -> &'static str {
        "UserMessage"
    }

    fn serialize_params(&self) -> Params {
        envelope_params(&self.content, self.name.as_deref(), &self.metadata, &self.id)
    }
}

impl Serializable for SystemMessage {
    fn type_tag(&self) -> &'static str {
        "SystemMessage"
    }

    fn serialize_params(&self) -> Params {
        envelope_params(&self.content, self.name.as_deref(), &self.metadata, &self.id)
    }
}

impl Serializable for SummaryMessage {
    fn type_tag(&self) -> &'static str {
        "SummaryMessage"
    }

    fn serialize_params(&self) -> Params {
        let mut fields = envelope_params(&self.content, None, &self.metadata, &self.id);
        fields.remove("name");
        fields.insert(
            "last_message_id".to_string(),
            params::encode_opt_string(self.last_message_id.as_deref()),
        );
        fields
    }
}

impl Serializable for ToolResult {
    fn type_tag(&self) -> &'static str {
        "ToolResult"
    }

    fn serialize_params(&self) -> Params {
        envelope_params(&self.content, Some(&self.name), &self.metadata, &self.id)
    }
}

impl Serializable for ModelMessage {
    fn type_tag(&self) -> &'static str {
        "ModelMessage"
    }

    fn serialize_params(&self) -> Params {
        let mut fields =
            envelope_params(&self.content, self.name.as_deref(), &self.metadata, &self.id);
        accounting_params(
            &mut fields,
            self.finish_reason,
            self.prompt_tokens,
            self.reply_tokens,
            self.cost,
        );
        fields
    }
}

impl Serializable for ToolUsage {
    fn type_tag(&self) -> &'static str {
        "ToolUsage"
    }

    fn serialize_params(&self) -> Params {
        let mut fields =
            envelope_params(&self.content, self.name.as_deref(), &self.metadata, &self.id);
        accounting_params(
            &mut fields,
            self.finish_reason,
            self.prompt_tokens,
            self.reply_tokens,
            self.cost,
        );
        fields.insert(
            "tool_name".to_string(),
            Value::String(self.tool_name.clone()),
        );
        fields.insert("args_str".to_string(), Value::String(self.args_str.clone()));
        fields
    }
}

impl Serializable for Message {
    fn type_tag(&self) -> &'static str {
        match self {
            Self::User(message) => message.type_tag(),
            Self::System(message) => message.type_tag(),
            Self::Summary(message) => message.type_tag(),
            Self::ToolResult(message) => message.type_tag(),
            Self::Model(message) => message.type_tag(),
            Self::ToolUsage(message) => message.type_tag(),
        }
    }

    fn serialize_params(&self) -> Params {
        match self {
            Self::User(message) => message.serialize_params(),
            Self::System(message) => message.serialize_params(),
            Self::Summary(message) => message.serialize_params(),
            Self::ToolResult(message) => message.serialize_params(),
            Self::Model(message) => message.serialize_params(),
            Self::ToolUsage(message) => message.serialize_params(),
        }
    }
}

impl Serializable for ChatModelSpec {
    fn type_tag(&self) -> &'static str {
        "ChatModelSpec"
    }

    fn serialize_params(&self) -> Params {
        let mut fields = Params::new();
        fields.insert("name".to_string(), Value::String(self.name.clone()));
        fields.insert("size".to_string(), Value::from(self.size));
        fields.insert("input_cost".to_string(), Value::from(self.input_cost));
        fields.insert("output_cost".to_string(), Value::from(self.output_cost));
        fields
    }
}

impl Serializable for ToolParameter {
    fn type_tag(&self) -> &'static str {
        "ToolParameter"
    }

    fn serialize_params(&self) -> Params {
        let mut fields = Params::new();
        fields.insert("type".to_string(), Value::String(self.kind.clone()));
        fields.insert("name".to_string(), Value::String(self.name.clone()));
        fields.insert(
            "description".to_string(),
            params::encode_opt_string(self.description.as_deref()),
        );
        fields.insert(
            "enum".to_string(),
            match &self.choices {
                Some(choices) => params::encode_string_list(choices),
                None => Value::Null,
            },
        );
        fields.insert("optional".to_string(), Value::Bool(self.optional));
        fields
    }
}

impl Serializable for ToolSpec {
    fn type_tag(&self) -> &'static str {
        "ToolSpec"
    }

    fn serialize_params(&self) -> Params {
        let mut fields = Params::new();
        fields.insert("name".to_string(), Value::String(self.name.clone()));
        fields.insert(
            "description".to_string(),
            Value::String(self.description.clone()),
        );
        fields.insert(
            "parameters".to_string(),
            params::encode_nested_list(&self.parameters),
        );
        fields
    }
}

impl Serializable for ModelConfig {
    fn type_tag(&self) -> &'static str {
        "ModelConfig"
    }

    fn serialize_params(&self) -> Params {
        let mut fields = Params::new();
        fields.insert(
            "chat_model".to_string(),
            params::encode_nested(&self.chat_model),
        );
        fields.insert("tools".to_string(), params::encode_nested_list(&self.tools));
        fields.insert(
            "allowed_tool".to_string(),
            params::encode_opt_string(self.allowed_tool.as_deref()),
        );
        fields.insert(
            "prompt".to_string(),
            match &self.prompt {
                Some(prompt) => params::encode_nested(prompt),
                None => Value::Null,
            },
        );
        fields.insert(
            "max_tokens".to_string(),
            match self.max_tokens {
                Some(max_tokens) => Value::from(max_tokens),
                None => Value::Null,
            },
        );
        fields.insert("streaming".to_string(), Value::Bool(self.streaming));
        fields.insert(
            "stop_sequences".to_string(),
            params::encode_string_list(&self.stop_sequences),
        );
        fields.insert(
            "temperature".to_string(),
            Value::from(f64::from(self.temperature)),
        );
        fields.insert(
            "presence_penalty".to_string(),
            Value::from(f64::from(self.presence_penalty)),
        );
        fields.insert(
            "frequency_penalty".to_string(),
            Value::from(f64::from(self.frequency_penalty)),
        );
        fields
    }
}

/// Any value the workspace codec can reconstruct.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Message(Message),
    ModelSpec(ChatModelSpec),
    Tool(ToolSpec),
    Parameter(ToolParameter),
    Config(ModelConfig),
}

impl Decoded {
    pub fn into_message(self) -> Option<Message> {
        match self {
            Self::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn into_model_spec(self) -> Option<ChatModelSpec> {
        match self {
            Self::ModelSpec(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn into_tool(self) -> Option<ToolSpec> {
        match self {
            Self::Tool(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn into_parameter(self) -> Option<ToolParameter> {
        match self {
            Self::Parameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    pub fn into_config(self) -> Option<ModelConfig> {
        match self {
            Self::Config(config) => Some(config),
            _ => None,
        }
    }
}

/// Build the registry of every persistable variant in this crate.
pub fn codec() -> CodecRegistry<Decoded> {
    let mut registry = CodecRegistry::new();
    registry.register("UserMessage", |fields| {
        decode_user(fields).map(|m| Decoded::Message(Message::User(m)))
    });
    registry.register("SystemMessage", |fields| {
        decode_system(fields).map(|m| Decoded::Message(Message::System(m)))
    });
    registry.register("SummaryMessage", |fields| {
        decode_summary(fields).map(|m| Decoded::Message(Message::Summary(m)))
    });
    registry.register("ToolResult", |fields| {
        decode_tool_result(fields).map(|m| Decoded::Message(Message::ToolResult(m)))
    });
    registry.register("ModelMessage", |fields| {
        decode_model_message(fields).map(|m| Decoded::Message(Message::Model(m)))
    });
    registry.register("ToolUsage", |fields| {
        decode_tool_usage(fields).map(|m| Decoded::Message(Message::ToolUsage(m)))
    });
    registry.register("ChatModelSpec", |fields| {
        decode_model_spec(fields).map(Decoded::ModelSpec)
    });
    registry.register("ToolParameter", |fields| {
        decode_parameter(fields).map(Decoded::Parameter)
    });
    registry.register("ToolSpec", |fields| decode_tool(fields).map(Decoded::Tool));
    registry.register("ModelConfig", |fields| {
        decode_config(fields).map(Decoded::Config)
    });
    registry
}

struct Envelope {
    content: String,
    name: Option<String>,
    metadata: MetadataMap,
    id: String,
}

fn decode_envelope(fields: &mut Params) -> Result<Envelope, DecodeError> {
    let name = params::take_opt_string(fields, "name")?;
    if let Some(name) = &name {
        validate_name(name).map_err(|err| DecodeError::invalid_field(err.to_string()))?;
    }

    Ok(Envelope {
        content: params::take_string(fields, "content")?,
        name,
        metadata: params::take_string_map(fields, "metadata")?
            .into_iter()
            .collect(),
        id: params::take_string(fields, "id")?,
    })
}

struct Accounting {
    finish_reason: FinishReason,
    prompt_tokens: u32,
    reply_tokens: u32,
    cost: f64,
}

fn decode_accounting(fields: &mut Params) -> Result<Accounting, DecodeError> {
    let wire = params::take_string(fields, "finish_reason")?;
    let finish_reason = FinishReason::parse(&wire)
        .ok_or_else(|| DecodeError::invalid_field(format!("unknown finish reason '{wire}'")))?;

    Ok(Accounting {
        finish_reason,
        prompt_tokens: params::take_u32(fields, "prompt_tokens")?,
        reply_tokens: params::take_u32(fields, "reply_tokens")?,
        cost: params::take_f64(fields, "cost")?,
    })
}

fn decode_user(fields: &mut Params) -> Result<UserMessage, DecodeError> {
    let envelope = decode_envelope(fields)?;
    Ok(UserMessage {
        content: envelope.content,
        name: envelope.name,
        metadata: envelope.metadata,
        id: envelope.id,
    })
}

fn decode_system(fields: &mut Params) -> Result<SystemMessage, DecodeError> {
    let envelope = decode_envelope(fields)?;
    Ok(SystemMessage {
        content: envelope.content,
        name: envelope.name,
        metadata: envelope.metadata,
        id: envelope.id,
    })
}

fn decode_summary(fields: &mut Params) -> Result<SummaryMessage, DecodeError> {
    Ok(SummaryMessage {
        content: params::take_string(fields, "content")?,
        metadata: params::take_string_map(fields, "metadata")?
            .into_iter()
            .collect(),
        id: params::take_string(fields, "id")?,
        last_message_id: params::take_opt_string(fields, "last_message_id")?,
    })
}

fn decode_tool_result(fields: &mut Params) -> Result<ToolResult, DecodeError> {
    let envelope = decode_envelope(fields)?;
    let name = envelope
        .name
        .ok_or_else(|| DecodeError::missing_field("name"))?;

    Ok(ToolResult {
        content: envelope.content,
        name,
        metadata: envelope.metadata,
        id: envelope.id,
    })
}

fn decode_model_message(fields: &mut Params) -> Result<ModelMessage, DecodeError> {
    let envelope = decode_envelope(fields)?;
    let accounting = decode_accounting(fields)?;

    Ok(ModelMessage {
        content: envelope.content,
        name: envelope.name,
        metadata: envelope.metadata,
        id: envelope.id,
        finish_reason: accounting.finish_reason,
        prompt_tokens: accounting.prompt_tokens,
        reply_tokens: accounting.reply_tokens,
        cost: accounting.cost,
    })
}

fn decode_tool_usage(fields: &mut Params) -> Result<ToolUsage, DecodeError> {
    let envelope = decode_envelope(fields)?;
    let accounting = decode_accounting(fields)?;

    Ok(ToolUsage {
        tool_name: params::take_string(fields, "tool_name")?,
        args_str: params::take_string(fields, "args_str")?,
        content: envelope.content,
        name: envelope.name,
        metadata: envelope.metadata,
        id: envelope.id,
        finish_reason: accounting.finish_reason,
        prompt_tokens: accounting.prompt_tokens,
        reply_tokens: accounting.reply_tokens,
        cost: accounting.cost,
    })
}

fn decode_model_spec(fields: &mut Params) -> Result<ChatModelSpec, DecodeError> {
    Ok(ChatModelSpec {
        name: params::take_string(fields, "name")?,
        size: params::take_u32(fields, "size")?,
        input_cost: params::take_f64(fields, "input_cost")?,
        output_cost: params::take_f64(fields, "output_cost")?,
    })
}

fn decode_parameter(fields: &mut Params) -> Result<ToolParameter, DecodeError> {
    let kind = params::take_string(fields, "type")?;
    let name = params::take_string(fields, "name")?;
    validate_name(&name).map_err(|err| DecodeError::invalid_field(err.to_string()))?;

    Ok(ToolParameter {
        kind,
        name,
        description: params::take_opt_string(fields, "description")?,
        choices: params::take_opt_string_list(fields, "enum")?,
        optional: params::take_bool(fields, "optional")?,
    })
}

fn decode_nested<T>(
    text: &str,
    expected: &str,
    decode: fn(&mut Params) -> Result<T, DecodeError>,
) -> Result<T, DecodeError> {
    let mut blob = parse_blob(text)?;
    if blob.tag != expected {
        return Err(DecodeError::invalid_field(format!(
            "expected nested '{expected}' blob, got '{}'",
            blob.tag
        )));
    }

    decode(&mut blob.params)
}

fn decode_tool(fields: &mut Params) -> Result<ToolSpec, DecodeError> {
    let name = params::take_string(fields, "name")?;
    let description = params::take_string(fields, "description")?;

    let parameters = params::take_string_list(fields, "parameters")?
        .iter()
        .map(|blob| decode_nested(blob, "ToolParameter", decode_parameter))
        .collect::<Result<Vec<_>, _>>()?;

    ToolSpec::new(name, description, parameters)
        .map_err(|err| DecodeError::invalid_field(err.to_string()))
}

fn decode_config(fields: &mut Params) -> Result<ModelConfig, DecodeError> {
    let chat_model_blob = params::take_string(fields, "chat_model")?;
    let chat_model = decode_nested(&chat_model_blob, "ChatModelSpec", decode_model_spec)?;

    let tools = params::take_string_list(fields, "tools")?
        .iter()
        .map(|blob| decode_nested(blob, "ToolSpec", decode_tool))
        .collect::<Result<Vec<_>, _>>()?;

    let prompt = match params::take_opt_string(fields, "prompt")? {
        Some(blob) => Some(decode_nested(&blob, "SystemMessage", decode_system)?),
        None => None,
    };

    let config = ModelConfig {
        chat_model,
        tools,
        allowed_tool: params::take_opt_string(fields, "allowed_tool")?,
        prompt,
        max_tokens: params::take_opt_u32(fields, "max_tokens")?,
        streaming: params::take_bool(fields, "streaming")?,
        stop_sequences: params::take_string_list(fields, "stop_sequences")?,
        temperature: params::take_f64(fields, "temperature")? as f32,
        presence_penalty: params::take_f64(fields, "presence_penalty")? as f32,
        frequency_penalty: params::take_f64(fields, "frequency_penalty")? as f32,
    };

    config
        .validate()
        .map_err(|err| DecodeError::invalid_field(err.to_string()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use qcodec::{DecodeErrorKind, serialize};

    use super::*;
    use crate::SUMMARY_MESSAGE_ID;

    fn round_trip(message: Message) -> Message {
        codec()
            .decode(&serialize(&message))
            .expect("decode should work")
            .into_message()
            .expect("blob holds a message")
    }

    #[test]
    fn every_message_variant_round_trips_field_equal() {
        let user = Message::User(
            UserMessage::new("hello")
                .with_name("alice")
                .expect("valid name")
                .with_metadata("chat", "42"),
        );
        let system = Message::System(SystemMessage::new("be brief"));
        let summary = Message::Summary(
            SummaryMessage::new("earlier: greetings").with_last_message_id("m9"),
        );
        let tool_result =
            Message::ToolResult(ToolResult::new("18C, cloudy", "weather").expect("valid name"));
        let model = Message::Model(
            ModelMessage::new("It's cloudy.")
                .with_finish_reason(FinishReason::Done)
                .with_usage(120, 8, 0.00042),
        );
        let usage = Message::ToolUsage(
            ToolUsage::new("weather", "{\"city\":\"Paris\",\"nested\":{\"a\":[1,2]}}")
                .with_finish_reason(FinishReason::ToolUse)
                .with_usage(90, 12, 0.0003),
        );

        for message in [user, system, summary, tool_result, model, usage] {
            assert_eq!(round_trip(message.clone()), message);
        }
    }

    #[test]
    fn summary_round_trip_keeps_fixed_id() {
        let decoded = round_trip(Message::Summary(SummaryMessage::new("digest")));
        assert_eq!(decoded.id(), SUMMARY_MESSAGE_ID);
    }

    #[test]
    fn config_round_trips_with_nested_blobs() {
        let parameter = ToolParameter::new("string", "city")
            .expect("valid name")
            .with_description("City to look up")
            .with_choices(["Paris", "Tokyo"]);
        let tool = ToolSpec::new("weather", "Current weather", vec![parameter]).expect("spec");

        let config = ModelConfig::new(ChatModelSpec::gpt4())
            .with_tools(vec![tool])
            .with_allowed_tool("weather")
            .with_prompt(SystemMessage::new("You are a weather bot."))
            .with_max_tokens(200)
            .with_stop_sequences(["\n\n"])
            .with_temperature(0.5);

        let decoded = codec()
            .decode(&serialize(&config))
            .expect("decode should work")
            .into_config()
            .expect("blob holds a config");

        assert_eq!(decoded, config);
    }

    #[test]
    fn unknown_tag_is_a_decode_error() {
        let error = codec()
            .decode("{\"serialized_type\":\"Widget\",\"serialized_params\":{}}")
            .expect_err("unknown tag should fail");
        assert_eq!(error.kind, DecodeErrorKind::UnknownTag);
    }

    #[test]
    fn invalid_stored_name_is_rejected_on_decode() {
        let mut message = UserMessage::new("hello");
        message.name = Some("not valid".to_string());

        let error = codec()
            .decode(&serialize(&message))
            .expect_err("invalid name should fail");
        assert_eq!(error.kind, DecodeErrorKind::InvalidField);
    }

    #[test]
    fn tool_result_blob_without_name_is_rejected() {
        let blob = "{\"serialized_type\":\"ToolResult\",\"serialized_params\":{\
            \"content\":\"x\",\"name\":null,\"metadata\":{},\"id\":\"m1\"}}";

        let error = codec().decode(blob).expect_err("missing name should fail");
        assert_eq!(error.kind, DecodeErrorKind::MissingField);
    }
}
