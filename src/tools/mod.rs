//! Tool system: capability trait, registry, and deadline-bound executor.

pub mod executor;
pub mod registry;
pub mod tool;

pub use executor::{ToolExecutor, DEFAULT_TOOL_TIMEOUT};
pub use registry::ToolRegistry;
pub use tool::{FnTool, Tool, ToolArguments, ToolParameters};
