//! Chat model catalog and per-run configuration.
//!
//! ```rust
//! use qprovider::{ChatModelSpec, ModelConfig};
//!
//! let config = ModelConfig::new(ChatModelSpec::gpt4())
//!     .with_temperature(0.2)
//!     .with_max_tokens(256);
//!
//! assert!(config.validate().is_ok());
//! assert!(config.streaming);
//! ```

use crate::{ConfigError, SystemMessage, ToolSpec};

/// Identity and pricing of a supported chat model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatModelSpec {
    pub name: String,
    /// Context window size, in tokens.
    pub size: u32,
    /// Cost of prompt tokens, in USD per 1k tokens.
    pub input_cost: f64,
    /// Cost of generated tokens, in USD per 1k tokens.
    pub output_cost: f64,
}

impl ChatModelSpec {
    pub fn new(name: impl Into<String>, size: u32, input_cost: f64, output_cost: f64) -> Self {
        Self {
            name: name.into(),
            size,
            input_cost,
            output_cost,
        }
    }

    pub fn chatgpt() -> Self {
        Self::new("gpt-3.5-turbo-0613", 4000, 0.0015, 0.002)
    }

    pub fn chatgpt_16k() -> Self {
        Self::new("gpt-3.5-turbo-16k", 16000, 0.003, 0.004)
    }

    pub fn gpt4() -> Self {
        Self::new("gpt-4", 8000, 0.03, 0.06)
    }

    pub fn gpt4_32k() -> Self {
        Self::new("gpt-4-32k", 32000, 0.06, 0.12)
    }

    pub fn supported() -> Vec<Self> {
        vec![
            Self::chatgpt(),
            Self::chatgpt_16k(),
            Self::gpt4(),
            Self::gpt4_32k(),
        ]
    }

    pub fn named(name: &str) -> Result<Self, ConfigError> {
        Self::supported()
            .into_iter()
            .find(|model| model.name == name)
            .ok_or_else(|| ConfigError::unknown_model(format!("unsupported chat model: {name}")))
    }

    /// USD cost of `tokens` prompt tokens at this model's input rate.
    pub fn prompt_cost(&self, tokens: u32) -> f64 {
        f64::from(tokens) / 1000.0 * self.input_cost
    }

    /// USD cost of `tokens` generated tokens at this model's output rate.
    pub fn reply_cost(&self, tokens: u32) -> f64 {
        f64::from(tokens) / 1000.0 * self.output_cost
    }
}

/// Immutable-per-run model configuration.
///
/// The generation loop reads configs by reference and never mutates them.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub chat_model: ChatModelSpec,
    /// Declared tools recorded with the configuration.
    pub tools: Vec<ToolSpec>,
    /// Tool gate: `None` permits any tool, an empty string disables tools,
    /// and a name forces that single tool.
    pub allowed_tool: Option<String>,
    pub prompt: Option<SystemMessage>,
    pub max_tokens: Option<u32>,
    pub streaming: bool,
    pub stop_sequences: Vec<String>,
    /// Token confidence threshold, in `[0.0, 2.0]`.
    pub temperature: f32,
    /// Penalty for repeated tokens, in `[-2.0, 2.0]`.
    pub presence_penalty: f32,
    /// Penalty based on token usage frequency, in `[-2.0, 2.0]`.
    pub frequency_penalty: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new(ChatModelSpec::chatgpt())
    }
}

impl ModelConfig {
    pub fn new(chat_model: ChatModelSpec) -> Self {
        Self {
            chat_model,
            tools: Vec::new(),
            allowed_tool: None,
            prompt: None,
            max_tokens: None,
            streaming: true,
            stop_sequences: Vec::new(),
            temperature: 1.0,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_allowed_tool(mut self, allowed_tool: impl Into<String>) -> Self {
        self.allowed_tool = Some(allowed_tool.into());
        self
    }

    pub fn tools_disabled(mut self) -> Self {
        self.allowed_tool = Some(String::new());
        self
    }

    pub fn with_prompt(mut self, prompt: SystemMessage) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_stop_sequences(
        mut self,
        stop_sequences: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.stop_sequences = stop_sequences.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_presence_penalty(mut self, presence_penalty: f32) -> Self {
        self.presence_penalty = presence_penalty;
        self
    }

    pub fn with_frequency_penalty(mut self, frequency_penalty: f32) -> Self {
        self.frequency_penalty = frequency_penalty;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid_parameter(
                "temperature must be in the inclusive range 0.0..=2.0",
            ));
        }

        if !(-2.0..=2.0).contains(&self.presence_penalty) {
            return Err(ConfigError::invalid_parameter(
                "presence_penalty must be in the inclusive range -2.0..=2.0",
            ));
        }

        if !(-2.0..=2.0).contains(&self.frequency_penalty) {
            return Err(ConfigError::invalid_parameter(
                "frequency_penalty must be in the inclusive range -2.0..=2.0",
            ));
        }

        if let Some(max_tokens) = self.max_tokens
            && max_tokens == 0
        {
            return Err(ConfigError::invalid_parameter(
                "max_tokens must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Resolve the `allowed_tool` gate against a set of declared tools.
    pub fn permitted_tools(&self, tools: &[ToolSpec]) -> Vec<ToolSpec> {
        match self.allowed_tool.as_deref() {
            None => tools.to_vec(),
            Some("") => Vec::new(),
            Some(forced) => tools
                .iter()
                .filter(|tool| tool.name == forced)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolParameter;

    fn specs() -> Vec<ToolSpec> {
        vec![
            ToolSpec::new("weather", "weather lookup", vec![]).expect("spec"),
            ToolSpec::new(
                "search",
                "web search",
                vec![ToolParameter::new("string", "query").expect("param")],
            )
            .expect("spec"),
        ]
    }

    #[test]
    fn catalog_lists_four_fixed_presets() {
        let supported = ChatModelSpec::supported();
        assert_eq!(supported.len(), 4);

        let gpt4 = ChatModelSpec::named("gpt-4").expect("gpt-4 should resolve");
        assert_eq!(gpt4.size, 8000);
        assert_eq!(gpt4.input_cost, 0.03);
        assert_eq!(gpt4.output_cost, 0.06);

        assert!(ChatModelSpec::named("gpt-99").is_err());
    }

    #[test]
    fn cost_helpers_scale_per_thousand_tokens() {
        let model = ChatModelSpec::chatgpt();
        assert_eq!(model.prompt_cost(2000), 0.003);
        assert_eq!(model.reply_cost(500), 0.001);
    }

    #[test]
    fn validate_checks_sampling_ranges() {
        assert!(ModelConfig::default().validate().is_ok());
        assert!(
            ModelConfig::default()
                .with_temperature(2.5)
                .validate()
                .is_err()
        );
        assert!(
            ModelConfig::default()
                .with_presence_penalty(-3.0)
                .validate()
                .is_err()
        );
        assert!(
            ModelConfig::default()
                .with_frequency_penalty(2.1)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn permitted_tools_resolves_the_gate() {
        let tools = specs();

        let any = ModelConfig::default();
        assert_eq!(any.permitted_tools(&tools).len(), 2);

        let disabled = ModelConfig::default().tools_disabled();
        assert!(disabled.permitted_tools(&tools).is_empty());

        let forced = ModelConfig::default().with_allowed_tool("search");
        let permitted = forced.permitted_tools(&tools);
        assert_eq!(permitted.len(), 1);
        assert_eq!(permitted[0].name, "search");
    }
}
