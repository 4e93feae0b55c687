//! Tool registry and dispatch for model-requested invocations.

use std::pin::pin;
use std::sync::Arc;

use futures_util::future::{Either, select};
use qcommon::Registry;
use qprovider::{ToolResult, ToolSpec, ToolUsage};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::{Tool, ToolError};

/// Fallback result name when a requested tool name fails envelope validation.
const FALLBACK_RESULT_NAME: &str = "unknown_tool";

/// Structural outcome of one tool execution attempt.
///
/// Cancellation is its own variant, never inferred from an error value.
#[derive(Debug)]
pub enum ToolOutcome {
    Completed { tool_name: String, output: String },
    Failed(ToolError),
    Cancelled,
}

/// Dispatcher over a fixed set of tools for one run.
///
/// The tool set is read-only after construction and safe to share across
/// conversations.
pub struct ToolsManager {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolsManager")
            .field("tools", &self.tools.len())
            .finish()
    }
}

impl ToolsManager {
    /// Build a manager from a fixed tool list; names must be unique.
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Result<Self, ToolError> {
        let mut registry = Registry::new();
        for tool in tools {
            let name = tool.spec().name;
            if registry.insert(name.clone(), tool).is_some() {
                return Err(ToolError::registration(format!(
                    "tool '{name}' is registered more than once"
                )));
            }
        }

        Ok(Self { tools: registry })
    }

    pub fn empty() -> Self {
        Self {
            tools: Registry::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|tool| tool.spec()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a model-requested tool invocation exactly once.
    ///
    /// Returns `None` when cancelled mid-execution; the caller must not
    /// synthesize a result in that case. Lookup, validation, and execution
    /// failures become the result content so they surface in conversation
    /// instead of aborting the loop.
    pub async fn use_tool(
        &self,
        usage: &ToolUsage,
        cancel: &CancellationToken,
    ) -> Option<ToolResult> {
        let (output, tool_name) = match self.execute(usage, cancel).await {
            ToolOutcome::Cancelled => return None,
            ToolOutcome::Completed { tool_name, output } => (output, tool_name),
            ToolOutcome::Failed(error) => (error.message, usage.tool_name.clone()),
        };

        ToolResult::new(&output, &tool_name)
            .ok()
            .or_else(|| ToolResult::new(output, FALLBACK_RESULT_NAME).ok())
    }

    /// Resolve, validate, and run an invocation, racing the body against the
    /// cancellation token.
    pub async fn execute(&self, usage: &ToolUsage, cancel: &CancellationToken) -> ToolOutcome {
        let Some(tool) = self.get(&usage.tool_name) else {
            return ToolOutcome::Failed(ToolError::not_found(format!(
                "Tool not found: {}",
                usage.tool_name
            )));
        };

        let args = match usage.arguments() {
            Ok(args) => args,
            Err(error) => {
                return ToolOutcome::Failed(ToolError::invalid_arguments(format!(
                    "Invalid argument string: {error}"
                )));
            }
        };

        let spec = tool.spec();
        if let Err(error) = validate_arguments(&spec, &args) {
            return ToolOutcome::Failed(error);
        }

        match select(pin!(cancel.cancelled()), tool.run(&args)).await {
            Either::Left(_) => ToolOutcome::Cancelled,
            Either::Right((Ok(output), _)) => ToolOutcome::Completed {
                tool_name: spec.name,
                output,
            },
            Either::Right((Err(error), _)) => ToolOutcome::Failed(error),
        }
    }
}

/// Check supplied arguments against a tool's declared parameters.
fn validate_arguments(spec: &ToolSpec, args: &Map<String, Value>) -> Result<(), ToolError> {
    for supplied in args.keys() {
        if spec.parameter(supplied).is_none() {
            return Err(ToolError::invalid_arguments(format!(
                "Invalid argument: {supplied}"
            )));
        }
    }

    for required in spec.required_parameters() {
        if !args.contains_key(required) {
            return Err(ToolError::invalid_arguments(format!(
                "Missing required argument: {required}"
            )));
        }
    }

    Ok(())
}
