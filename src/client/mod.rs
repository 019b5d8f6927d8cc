//! Completion service client trait and request types.

pub mod http;
pub mod openai;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::SectraError;
use crate::types::{ChatDelta, Message};

pub use openai::OpenAiClient;

/// A streaming chat completion request.
///
/// The message list is already fully ordered (system instruction first,
/// then history); streaming is implied.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool schema sent to the completion service.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Core trait implemented by completion service clients.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Start one streaming completion turn.
    async fn stream_chat(
        &self,
        request: &ChatRequest,
    ) -> Result<BoxStream<'static, Result<ChatDelta, SectraError>>, SectraError>;
}
