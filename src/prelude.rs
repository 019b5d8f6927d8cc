//! Convenience re-exports for common use.

pub use crate::agent::{Agent, AgentEvent, AgentEventKind};
pub use crate::client::{ChatRequest, CompletionClient, OpenAiClient, ToolDefinition};
pub use crate::config::AgentConfig;
pub use crate::error::{Result, SectraError};
pub use crate::tools::{FnTool, Tool, ToolArguments, ToolParameters};
pub use crate::types::{ChatDelta, FinishReason, Message, Role, ToolCall, ToolCallFragment};
