//! Stream accumulator — folds partial deltas into text and tool-call buffers.

use std::collections::BTreeMap;

use tracing::warn;

use crate::types::{ChatDelta, FinishReason, ToolCall};

/// Diagnostic key substituted when a buffer's argument text fails to parse.
pub const UNPARSED_ARGUMENTS_KEY: &str = "_unparsed_arguments";

/// In-progress tool call, keyed by the service's position index.
#[derive(Debug, Default, Clone)]
struct ToolCallBuffer {
    id: String,
    name: String,
    arguments: String,
}

/// Consumes the ordered delta sequence of one completion turn.
///
/// Text fragments concatenate in arrival order; tool-call fragments merge
/// into index-keyed buffers where the first non-empty id and name win and
/// argument fragments concatenate. Argument text is not assumed to arrive
/// as one parseable unit per update.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    buffers: BTreeMap<u32, ToolCallBuffer>,
    finish_reason: Option<FinishReason>,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one delta. Returns the text fragment, if any, so the caller can
    /// echo it immediately.
    pub fn push<'a>(&mut self, delta: &'a ChatDelta) -> Option<&'a str> {
        for fragment in &delta.tool_calls {
            let buffer = self.buffers.entry(fragment.index).or_default();
            if buffer.id.is_empty() {
                if let Some(id) = fragment.id.as_deref() {
                    buffer.id = id.to_string();
                }
            }
            if buffer.name.is_empty() {
                if let Some(name) = fragment.name.as_deref() {
                    buffer.name = name.to_string();
                }
            }
            if let Some(args) = fragment.arguments.as_deref() {
                buffer.arguments.push_str(args);
            }
        }

        if let Some(reason) = delta.finish_reason {
            self.finish_reason = Some(reason);
        }

        if delta.text.is_empty() {
            None
        } else {
            self.text.push_str(&delta.text);
            Some(&delta.text)
        }
    }

    /// Finish signal observed so far, if any.
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finish_reason
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.buffers.is_empty()
    }

    /// Drain into accumulated text and finalized calls, in index order.
    ///
    /// A buffer whose argument text does not parse as a JSON object is not
    /// discarded: its arguments become a map with a single diagnostic key
    /// holding the raw string, so the executor can still reject it visibly.
    pub fn into_parts(self) -> (String, Vec<ToolCall>) {
        let calls = self
            .buffers
            .into_values()
            .map(|buffer| {
                let arguments = match serde_json::from_str::<serde_json::Value>(&buffer.arguments)
                {
                    Ok(serde_json::Value::Object(map)) => map,
                    _ => {
                        warn!(
                            tool = %buffer.name,
                            raw = %buffer.arguments,
                            "tool call arguments did not parse as an object"
                        );
                        let mut map = serde_json::Map::new();
                        map.insert(
                            UNPARSED_ARGUMENTS_KEY.to_string(),
                            serde_json::Value::String(buffer.arguments),
                        );
                        map
                    }
                };
                ToolCall {
                    id: buffer.id,
                    name: buffer.name,
                    arguments,
                }
            })
            .collect();
        (self.text, calls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCallFragment;

    fn fragment(
        index: u32,
        id: Option<&str>,
        name: Option<&str>,
        arguments: Option<&str>,
    ) -> ToolCallFragment {
        ToolCallFragment {
            index,
            id: id.map(String::from),
            name: name.map(String::from),
            arguments: arguments.map(String::from),
        }
    }

    fn delta_with(fragments: Vec<ToolCallFragment>) -> ChatDelta {
        ChatDelta {
            tool_calls: fragments,
            ..Default::default()
        }
    }

    #[test]
    fn text_concatenates_in_arrival_order() {
        let mut acc = StreamAccumulator::new();
        assert_eq!(acc.push(&ChatDelta::text("Hel")), Some("Hel"));
        assert_eq!(acc.push(&ChatDelta::text("lo")), Some("lo"));
        assert_eq!(acc.push(&ChatDelta::finish(FinishReason::Stop)), None);
        let (text, calls) = acc.into_parts();
        assert_eq!(text, "Hello");
        assert!(calls.is_empty());
    }

    #[test]
    fn fragments_merge_with_first_nonempty_id_and_name() {
        let mut acc = StreamAccumulator::new();
        acc.push(&delta_with(vec![fragment(
            0,
            Some("call_1"),
            Some("search_sections"),
            Some("{\"sec"),
        )]));
        acc.push(&delta_with(vec![fragment(
            0,
            None,
            None,
            Some("tion_number\":\"4.7\"}"),
        )]));
        acc.push(&ChatDelta::finish(FinishReason::ToolCalls));

        let (_, calls) = acc.into_parts();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[0].name, "search_sections");
        assert_eq!(calls[0].arguments["section_number"], "4.7");
    }

    #[test]
    fn buffers_finalize_in_index_order() {
        let mut acc = StreamAccumulator::new();
        acc.push(&delta_with(vec![
            fragment(1, Some("call_b"), Some("get_chunks"), Some("{}")),
            fragment(0, Some("call_a"), Some("search_sections"), Some("{}")),
        ]));

        let (_, calls) = acc.into_parts();
        assert_eq!(calls[0].id, "call_a");
        assert_eq!(calls[1].id, "call_b");
    }

    #[test]
    fn malformed_arguments_become_diagnostic_map() {
        let mut acc = StreamAccumulator::new();
        acc.push(&delta_with(vec![fragment(
            0,
            Some("call_1"),
            Some("get_chunks"),
            Some("{not json"),
        )]));

        let (_, calls) = acc.into_parts();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].arguments[UNPARSED_ARGUMENTS_KEY], "{not json");
    }

    #[test]
    fn non_object_arguments_are_treated_as_malformed() {
        let mut acc = StreamAccumulator::new();
        acc.push(&delta_with(vec![fragment(
            0,
            Some("call_1"),
            Some("get_chunks"),
            Some("[1,2]"),
        )]));

        let (_, calls) = acc.into_parts();
        assert_eq!(calls[0].arguments[UNPARSED_ARGUMENTS_KEY], "[1,2]");
    }

    #[test]
    fn finish_reason_is_recorded() {
        let mut acc = StreamAccumulator::new();
        assert_eq!(acc.finish_reason(), None);
        acc.push(&ChatDelta::finish(FinishReason::Length));
        assert_eq!(acc.finish_reason(), Some(FinishReason::Length));
    }
}
