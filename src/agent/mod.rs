//! Agent orchestration: accumulator, loop guard, events, controller.

pub mod accumulator;
pub mod controller;
pub mod events;
pub mod guard;

pub use accumulator::StreamAccumulator;
pub use controller::Agent;
pub use events::{AgentEvent, AgentEventKind};
pub use guard::{LoopGuard, LOOP_THRESHOLD};
