//! Observable events emitted by the agent controller.

use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Discriminant for [`AgentEvent`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentEventKind {
    Text,
    ToolCall,
    ToolResult,
}

/// The unit the controller yields to its caller. This is the only channel
/// through which the controller's internal state becomes observable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentEvent {
    pub kind: AgentEventKind,
    /// Short human-readable fragment for display.
    pub content: String,
    /// The message just appended to history (tool_call / tool_result only).
    /// Callers retaining their own history must append it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl AgentEvent {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: AgentEventKind::Text,
            content: content.into(),
            message: None,
        }
    }

    pub fn tool_call(content: impl Into<String>, message: Message) -> Self {
        Self {
            kind: AgentEventKind::ToolCall,
            content: content.into(),
            message: Some(message),
        }
    }

    pub fn tool_result(content: impl Into<String>, message: Message) -> Self {
        Self {
            kind: AgentEventKind::ToolResult,
            content: content.into(),
            message: Some(message),
        }
    }
}
