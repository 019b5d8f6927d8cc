//! OpenAI-compatible Chat Completions streaming client.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Deserialize;
use tracing::debug;

use crate::error::SectraError;
use crate::types::{ChatDelta, FinishReason, Message, Role, ToolCallFragment};

use super::http::{bearer_headers, parse_sse_data, shared_client, status_to_error};
use super::{ChatRequest, CompletionClient};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for any Chat Completions-compatible endpoint.
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn build_request_body(&self, request: &ChatRequest) -> serde_json::Value {
        let messages = request
            .messages
            .iter()
            .map(message_to_wire)
            .collect::<Vec<_>>();

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": messages,
            "stream": true,
        });

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() {
                let tool_defs: Vec<serde_json::Value> = tools
                    .iter()
                    .map(|t| {
                        serde_json::json!({
                            "type": "function",
                            "function": {
                                "name": t.name,
                                "description": t.description,
                                "parameters": t.parameters,
                            }
                        })
                    })
                    .collect();
                body.as_object_mut()
                    .expect("request body is an object")
                    .insert("tools".into(), tool_defs.into());
            }
        }

        body
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn stream_chat(
        &self,
        request: &ChatRequest,
    ) -> Result<BoxStream<'static, Result<ChatDelta, SectraError>>, SectraError> {
        let body = self.build_request_body(request);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %request.model, messages = request.messages.len(), "chat completion request");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let byte_stream = resp.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer = String::new();
            futures::pin_mut!(byte_stream);

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(SectraError::Network(e));
                        break;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim().to_string();
                    buffer = buffer[line_end + 1..].to_string();

                    if line.is_empty() || line.starts_with(':') {
                        continue;
                    }

                    if let Some(data) = parse_sse_data(&line) {
                        match serde_json::from_str::<WireStreamChunk>(data) {
                            Ok(chunk) => {
                                if let Some(choice) = chunk.choices.into_iter().next() {
                                    yield Ok(choice_to_delta(choice));
                                }
                            }
                            Err(_) => {} // skip unparseable chunks
                        }
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

fn choice_to_delta(choice: WireStreamChoice) -> ChatDelta {
    let tool_calls = choice
        .delta
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCallFragment {
            index: tc.index,
            id: tc.id,
            name: tc.function.as_ref().and_then(|f| f.name.clone()),
            arguments: tc.function.and_then(|f| f.arguments),
        })
        .collect();

    ChatDelta {
        text: choice.delta.content.unwrap_or_default(),
        tool_calls,
        finish_reason: choice.finish_reason.as_deref().map(FinishReason::parse),
    }
}

fn message_to_wire(msg: &Message) -> serde_json::Value {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };

    if let Some(ref call_id) = msg.tool_call_id {
        return serde_json::json!({
            "role": "tool",
            "tool_call_id": call_id,
            "content": msg.content,
        });
    }

    if let Some(ref calls) = msg.tool_calls {
        let tc_json: Vec<serde_json::Value> = calls
            .iter()
            .map(|tc| {
                serde_json::json!({
                    "id": tc.id,
                    "type": "function",
                    "function": {
                        "name": tc.name,
                        "arguments": serde_json::Value::Object(tc.arguments.clone()).to_string(),
                    }
                })
            })
            .collect();
        return serde_json::json!({
            "role": role,
            "content": if msg.content.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::Value::String(msg.content.clone())
            },
            "tool_calls": tc_json,
        });
    }

    serde_json::json!({ "role": role, "content": msg.content })
}

// Chat Completions wire types (internal)

#[derive(Deserialize)]
struct WireStreamChunk {
    choices: Vec<WireStreamChoice>,
}

#[derive(Deserialize)]
struct WireStreamChoice {
    delta: WireStreamDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct WireStreamDelta {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCallDelta>>,
}

#[derive(Deserialize)]
struct WireToolCallDelta {
    index: u32,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    function: Option<WireFunctionDelta>,
}

#[derive(Deserialize)]
struct WireFunctionDelta {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    arguments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCall;

    #[test]
    fn assistant_tool_calls_serialize_with_string_arguments() {
        let mut args = serde_json::Map::new();
        args.insert("section_number".into(), "4.7".into());
        let msg = Message::assistant("").with_tool_calls(vec![ToolCall {
            id: "call_1".into(),
            name: "search_sections".into(),
            arguments: args,
        }]);

        let wire = message_to_wire(&msg);
        assert_eq!(wire["role"], "assistant");
        assert!(wire["content"].is_null());
        assert_eq!(wire["tool_calls"][0]["function"]["name"], "search_sections");
        assert_eq!(
            wire["tool_calls"][0]["function"]["arguments"],
            "{\"section_number\":\"4.7\"}"
        );
    }

    #[test]
    fn tool_message_carries_call_id() {
        let msg = Message::tool_result("call_9", "{\"found\":true}");
        let wire = message_to_wire(&msg);
        assert_eq!(wire["role"], "tool");
        assert_eq!(wire["tool_call_id"], "call_9");
    }

    #[test]
    fn wire_chunk_with_tool_call_fragment_parses() {
        let data = r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"id":"call_1","function":{"name":"search_sections","arguments":"{\"sec"}}]},"finish_reason":null}]}"#;
        let chunk: WireStreamChunk = serde_json::from_str(data).unwrap();
        let delta = choice_to_delta(chunk.choices.into_iter().next().unwrap());
        assert_eq!(delta.tool_calls.len(), 1);
        let frag = &delta.tool_calls[0];
        assert_eq!(frag.index, 0);
        assert_eq!(frag.id.as_deref(), Some("call_1"));
        assert_eq!(frag.name.as_deref(), Some("search_sections"));
        assert_eq!(frag.arguments.as_deref(), Some("{\"sec"));
    }
}
