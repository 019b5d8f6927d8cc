//! Streaming delta types.

use serde::{Deserialize, Serialize};

use super::message::FinishReason;

/// One partial update from a streaming completion turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatDelta {
    /// Incremental assistant text, if any.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// Partial tool-call fragments carried by this update.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallFragment>,
    /// Finish signal (only on the final delta of a turn).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

impl ChatDelta {
    /// A text-only delta.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// A delta carrying only a finish signal.
    pub fn finish(reason: FinishReason) -> Self {
        Self {
            finish_reason: Some(reason),
            ..Default::default()
        }
    }
}

/// A fragment of an in-progress tool call, tagged with its position index.
///
/// The service may split a call's id, name, and argument text across many
/// updates; the argument string in particular arrives as arbitrary slices
/// that only parse once concatenated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallFragment {
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}
