//! Agent controller — the turn state machine over the completion stream.

use std::sync::Arc;

use async_stream::try_stream;
use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::client::{ChatRequest, CompletionClient};
use crate::config::AgentConfig;
use crate::error::SectraError;
use crate::tools::{Tool, ToolExecutor, ToolRegistry};
use crate::types::{FinishReason, Message};

use super::accumulator::StreamAccumulator;
use super::events::AgentEvent;
use super::guard::LoopGuard;

/// Announcement streamed to the caller when a doom loop is detected.
const LOOP_DETECTED_NOTICE: &str =
    "\n[Repetitive tool calls detected — answering with what has been gathered so far.]\n";

/// Nudge appended to history before the final, tool-disabled request.
const LOOP_NUDGE: &str = "You have requested the same tool call with the same arguments \
     several times in a row. Do not call any more tools. Answer the question now using \
     the information already gathered.";

/// Drives repeated turns against the completion service: accumulates
/// deltas, dispatches tool calls sequentially, guards against doom loops,
/// and yields a lazy sequence of [`AgentEvent`]s.
///
/// One caller consumes each event stream to completion or abandons it;
/// concurrent re-entry on the same agent is unsupported. The loop guard
/// spans the agent's whole lifetime, not a single `stream_response` call.
pub struct Agent {
    client: Arc<dyn CompletionClient>,
    model: String,
    system_prompt: String,
    executor: ToolExecutor,
    guard: LoopGuard,
}

impl Agent {
    /// Create an agent from a client, configuration, and capability list.
    pub fn new(
        client: Arc<dyn CompletionClient>,
        config: AgentConfig,
        tools: Vec<Arc<dyn Tool>>,
    ) -> Self {
        Self {
            client,
            model: config.model,
            system_prompt: config.system_prompt,
            executor: ToolExecutor::new(ToolRegistry::new(tools)),
            guard: LoopGuard::new(),
        }
    }

    /// Override the per-call tool deadline.
    pub fn with_tool_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.executor = self.executor.with_timeout(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run the turn loop for one user interaction.
    ///
    /// The caller supplies the working history and must not mutate it
    /// concurrently while iterating. Transport and protocol failures from
    /// the completion service surface as `Err` items and end the stream;
    /// tool-level failures never do.
    pub fn stream_response(
        &mut self,
        history: Vec<Message>,
    ) -> impl Stream<Item = Result<AgentEvent, SectraError>> + '_ {
        try_stream! {
            let mut history = history;
            let mut tools_enabled = true;

            'turns: loop {
                let request = ChatRequest {
                    model: self.model.clone(),
                    messages: self.request_messages(&history),
                    tools: if tools_enabled {
                        self.executor.registry().definitions()
                    } else {
                        None
                    },
                };

                let mut stream = self.client.stream_chat(&request).await?;
                let mut acc = StreamAccumulator::new();

                while let Some(delta) = stream.next().await {
                    let delta = delta?;
                    if let Some(text) = acc.push(&delta) {
                        yield AgentEvent::text(text);
                    }
                    if acc.finish_reason().is_some() {
                        break;
                    }
                }

                let finish = acc.finish_reason();
                debug!(?finish, tool_calls = acc.has_tool_calls(), "turn complete");

                // The loop-abort turn is terminal no matter how it finishes;
                // tool use is not permitted regardless of what the model asks.
                if !tools_enabled {
                    let (text, _) = acc.into_parts();
                    history.push(self.assistant_message(text, finish));
                    break 'turns;
                }

                match finish {
                    Some(FinishReason::Stop) => {
                        let (text, _) = acc.into_parts();
                        history.push(self.assistant_message(text, finish));
                        break 'turns;
                    }
                    Some(FinishReason::Length) => {
                        // Truncated output: keep the partial message and ask
                        // the service to continue from the longer history.
                        let (text, _) = acc.into_parts();
                        history.push(self.assistant_message(text, finish));
                        continue 'turns;
                    }
                    Some(FinishReason::ToolCalls) => {
                        let (text, calls) = acc.into_parts();
                        if calls.is_empty() {
                            // finish=tool_calls with no finalized buffers is a
                            // protocol violation; re-requesting would spin with
                            // unchanged history, so terminate like an unknown
                            // finish signal instead.
                            warn!("finish=tool_calls carried no tool calls, terminating turn");
                            history.push(self.assistant_message(text, finish));
                            break 'turns;
                        }
                        let assistant = self
                            .assistant_message(text, finish)
                            .with_tool_calls(calls.clone());
                        history.push(assistant.clone());

                        let names = calls
                            .iter()
                            .map(|c| c.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", ");
                        yield AgentEvent::tool_call(format!("Calling: {names}"), assistant);

                        for call in &calls {
                            if self.guard.record(call) {
                                warn!(tool = %call.name, "doom loop detected");
                                yield AgentEvent::text(LOOP_DETECTED_NOTICE);
                                history.push(Message::user(LOOP_NUDGE));
                                tools_enabled = false;
                                continue 'turns;
                            }

                            let result = self.executor.execute(call).await;
                            let summary =
                                format!("[{}] {}", call.name, truncate(&result.content, 200));
                            history.push(result.clone());
                            yield AgentEvent::tool_result(summary, result);
                        }
                        continue 'turns;
                    }
                    other => {
                        // Unknown or absent finish signal: unrecoverable
                        // protocol condition, not retried. Keep whatever
                        // text was gathered.
                        warn!(finish = ?other, "unrecognized finish signal, terminating turn");
                        let (text, _) = acc.into_parts();
                        history.push(self.assistant_message(text, other));
                        break 'turns;
                    }
                }
            }
        }
    }

    /// System instruction first, then the visible history. The instruction
    /// is reconstructed per request and never stored in the history itself.
    fn request_messages(&self, history: &[Message]) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        if !self.system_prompt.is_empty() {
            messages.push(Message::system(&self.system_prompt));
        }
        messages.extend(history.iter().cloned());
        messages
    }

    fn assistant_message(&self, text: String, finish: Option<FinishReason>) -> Message {
        let mut msg = Message::assistant(text).with_model(&self.model);
        msg.finish_reason = finish;
        msg
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("héllo", 2), "hé");
    }
}
