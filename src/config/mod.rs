//! Configuration (env-first, with builder overrides).

use crate::error::{Result, SectraError};

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Construction-time configuration for an agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub system_prompt: String,
}

impl AgentConfig {
    /// Build a config with an explicit key, defaults elsewhere.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: String::new(),
        }
    }

    /// Load from the environment (reads a `.env` file first if present).
    ///
    /// Keys: `SECTRA_API_KEY` (falls back to `OPENAI_API_KEY`),
    /// `SECTRA_BASE_URL`, `SECTRA_MODEL`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("SECTRA_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .map_err(|_| {
                SectraError::Configuration(
                    "Missing SECTRA_API_KEY or OPENAI_API_KEY".to_string(),
                )
            })?;

        Ok(Self {
            api_key,
            base_url: std::env::var("SECTRA_BASE_URL").ok(),
            model: std::env::var("SECTRA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            system_prompt: String::new(),
        })
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the system instruction text.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}
