//! Tool registry — fixed name→capability mapping built once.

use std::collections::HashMap;
use std::sync::Arc;

use crate::client::ToolDefinition;

use super::tool::Tool;

/// Maps tool name to capability. Built at construction, never mutated.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    /// Names in registration order, for stable definition lists.
    order: Vec<String>,
}

impl ToolRegistry {
    /// Build a registry from a capability list. Later entries with a
    /// duplicate name replace earlier ones.
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        let mut registry = Self::default();
        for tool in tools {
            let name = tool.name().to_string();
            if registry.tools.insert(name.clone(), tool).is_none() {
                registry.order.push(name);
            }
        }
        registry
    }

    /// Resolve a capability by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Wire-format definitions for a completion request, in registration
    /// order. `None` when the registry is empty.
    pub fn definitions(&self) -> Option<Vec<ToolDefinition>> {
        if self.order.is_empty() {
            return None;
        }
        Some(
            self.order
                .iter()
                .filter_map(|name| self.tools.get(name))
                .map(|t| ToolDefinition {
                    name: t.name().to_string(),
                    description: t.description().to_string(),
                    parameters: t.parameters().schema.clone(),
                })
                .collect(),
        )
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}
