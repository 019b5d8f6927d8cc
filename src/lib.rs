//! Sectra — streaming tool-use orchestration core for document Q&A agents.
//!
//! Given a running message history and a registry of callable tools, the
//! [`agent::Agent`] drives repeated turns against a streaming completion
//! service, executes requested tools with a deadline, guards against doom
//! loops, and yields observable events to its caller.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use futures::StreamExt;
//! use sectra::prelude::*;
//!
//! # async fn example() -> sectra::error::Result<()> {
//! let config = AgentConfig::from_env()?
//!     .with_system_prompt("You answer questions about the loaded document.");
//! let client = Arc::new(OpenAiClient::new(&config.api_key, config.base_url.clone()));
//! let mut agent = Agent::new(client, config, Vec::new());
//!
//! let history = vec![Message::user("What is section 4.7 about?")];
//! let mut events = std::pin::pin!(agent.stream_response(history));
//! while let Some(event) = events.next().await {
//!     print!("{}", event?.content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod tools;
pub mod types;
