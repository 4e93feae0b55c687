//! Tool trait contract for manager-dispatched capabilities.
//!
//! ```rust
//! use qprovider::ToolSpec;
//! use qtooling::{FunctionTool, Tool};
//!
//! let tool = FunctionTool::new(
//!     ToolSpec::new("echo", "Echoes input", vec![]).expect("spec"),
//!     |args| async move { Ok(serde_json::Value::Object(args).to_string()) },
//! );
//!
//! assert_eq!(tool.spec().name, "echo");
//! ```

use std::future::Future;
use std::sync::Arc;

use qcommon::BoxFuture;
use qprovider::ToolSpec;
use serde_json::{Map, Value};

use crate::ToolError;

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

/// A callable capability: a declaration plus an execution body.
///
/// The body receives arguments already validated against the declared
/// parameters and returns conversational text or fails.
pub trait Tool: Send + Sync {
    fn spec(&self) -> ToolSpec;

    fn run<'a>(
        &'a self,
        args: &'a Map<String, Value>,
    ) -> ToolFuture<'a, Result<String, ToolError>>;
}

type ToolHandler =
    dyn Fn(Map<String, Value>) -> ToolFuture<'static, Result<String, ToolError>> + Send + Sync;

/// Adapter turning an async closure into a [`Tool`].
pub struct FunctionTool {
    spec: ToolSpec,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    pub fn new<F, Fut>(spec: ToolSpec, handler: F) -> Self
    where
        F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        let handler: Arc<ToolHandler> = Arc::new(move |args| Box::pin(handler(args)));

        Self { spec, handler }
    }
}

impl Tool for FunctionTool {
    fn spec(&self) -> ToolSpec {
        self.spec.clone()
    }

    fn run<'a>(
        &'a self,
        args: &'a Map<String, Value>,
    ) -> ToolFuture<'a, Result<String, ToolError>> {
        (self.handler)(args.clone())
    }
}
