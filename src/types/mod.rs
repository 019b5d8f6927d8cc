//! Core value types.

pub mod message;
pub mod stream;

pub use message::{FinishReason, Message, Role, ToolCall};
pub use stream::{ChatDelta, ToolCallFragment};
