//! Tool executor — deadline-raced invocation with structured error results.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::SectraError;
use crate::types::{Message, ToolCall};

use super::registry::ToolRegistry;

/// Default deadline for a single tool invocation.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Invokes capabilities with a deadline, converting every failure into a
/// structured textual result rather than propagating it. Calls from one
/// turn are executed strictly sequentially.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    registry: ToolRegistry,
    timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Override the deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute one call, always producing a tool message.
    ///
    /// Unknown names, capability errors, and deadline overruns all become
    /// JSON error objects in the message content; the model reads them and
    /// reacts on its next turn. On timeout the capability's future is
    /// dropped, but work it spawned itself may keep running.
    pub async fn execute(&self, call: &ToolCall) -> Message {
        let Some(tool) = self.registry.get(&call.name) else {
            warn!(tool = %call.name, "unknown tool requested");
            return Message::tool_result(
                &call.id,
                error_payload(&call.name, format!("Unknown tool: {}", call.name)),
            );
        };

        debug!(tool = %call.name, call_id = %call.id, "executing tool");

        let content = match tokio::time::timeout(self.timeout, tool.execute(&call.arguments)).await
        {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                warn!(tool = %call.name, error = %err, "tool execution failed");
                error_payload(&call.name, err.to_string())
            }
            Err(_) => {
                let err = SectraError::Timeout(self.timeout.as_millis() as u64);
                warn!(tool = %call.name, timeout_ms = self.timeout.as_millis() as u64, "tool timed out");
                error_payload(&call.name, err.to_string())
            }
        };

        Message::tool_result(&call.id, content)
    }
}

fn error_payload(tool_name: &str, message: String) -> String {
    serde_json::json!({
        "error": message,
        "tool": tool_name,
    })
    .to_string()
}
