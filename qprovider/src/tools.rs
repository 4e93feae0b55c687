//! Declarative tool and parameter descriptions exchanged with the model.
//!
//! ```rust
//! use qprovider::{ToolParameter, ToolSpec};
//!
//! let city = ToolParameter::new("string", "city").expect("valid name");
//! let unit = ToolParameter::new("string", "unit")
//!     .expect("valid name")
//!     .with_choices(["celsius", "fahrenheit"])
//!     .optional();
//!
//! let spec = ToolSpec::new("weather", "Current weather for a city", vec![city, unit])
//!     .expect("spec should validate");
//! assert_eq!(spec.required_parameters(), vec!["city"]);
//! ```

use crate::{ConfigError, validate_name};

/// One typed parameter of a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolParameter {
    /// JSON type tag, e.g. "string" or "number".
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
    /// Enumeration of allowed values, when the parameter is closed.
    pub choices: Option<Vec<String>>,
    pub optional: bool,
}

impl ToolParameter {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_name(&name)?;

        Ok(Self {
            kind: kind.into(),
            name,
            description: None,
            choices: None,
            optional: false,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_choices(
        mut self,
        choices: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// A callable capability as declared to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolSpec {
    /// Build a spec, rejecting invalid tool names and duplicate parameters.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ToolParameter>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_name(&name)?;

        for (index, parameter) in parameters.iter().enumerate() {
            let duplicated = parameters[..index]
                .iter()
                .any(|earlier| earlier.name == parameter.name);
            if duplicated {
                return Err(ConfigError::invalid_parameter(format!(
                    "tool '{name}' declares parameter '{}' more than once",
                    parameter.name
                )));
            }
        }

        Ok(Self {
            name,
            description: description.into(),
            parameters,
        })
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters
            .iter()
            .find(|parameter| parameter.name == name)
    }

    pub fn required_parameters(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|parameter| !parameter.optional)
            .map(|parameter| parameter.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city() -> ToolParameter {
        ToolParameter::new("string", "city").expect("valid name")
    }

    #[test]
    fn spec_rejects_duplicate_parameter_names() {
        let error = ToolSpec::new("weather", "weather lookup", vec![city(), city()])
            .expect_err("duplicates should fail");
        assert!(error.message.contains("city"));
    }

    #[test]
    fn spec_rejects_invalid_tool_names() {
        assert!(ToolSpec::new("weather lookup", "desc", vec![]).is_err());
    }

    #[test]
    fn required_parameters_exclude_optional_ones() {
        let unit = ToolParameter::new("string", "unit")
            .expect("valid name")
            .optional();
        let spec = ToolSpec::new("weather", "weather lookup", vec![city(), unit])
            .expect("spec should build");

        assert_eq!(spec.required_parameters(), vec!["city"]);
        assert!(spec.parameter("unit").is_some_and(|p| p.optional));
        assert!(spec.parameter("bogus").is_none());
    }
}
