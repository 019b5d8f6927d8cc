//! Loop guard — detects identical consecutive tool invocations.

use crate::types::ToolCall;

/// Consecutive identical calls at which a doom loop is declared.
pub const LOOP_THRESHOLD: usize = 3;

/// Session-long log of (tool name, canonical argument serialization) pairs.
/// Never reset between turns.
///
/// Canonicalization relies on `serde_json` object maps being key-sorted, so
/// semantically identical argument maps serialize identically, including
/// nested objects.
#[derive(Debug, Default)]
pub struct LoopGuard {
    calls: Vec<(String, String)>,
}

impl LoopGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a call. Returns `true` when the trailing window of
    /// [`LOOP_THRESHOLD`] entries is pairwise identical.
    pub fn record(&mut self, call: &ToolCall) -> bool {
        let entry = (call.name.clone(), canonical_arguments(call));
        self.calls.push(entry);

        if self.calls.len() < LOOP_THRESHOLD {
            return false;
        }
        let window = &self.calls[self.calls.len() - LOOP_THRESHOLD..];
        window.iter().all(|e| *e == window[0])
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

fn canonical_arguments(call: &ToolCall) -> String {
    serde_json::Value::Object(call.arguments.clone()).to_string()
}
