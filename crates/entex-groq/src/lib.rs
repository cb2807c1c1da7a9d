//! Groq chat-completion client for entex.
//!
//! This crate sends one formatted prompt to an OpenAI-compatible
//! `/chat/completions` endpoint and returns the completion text, with a
//! bounded per-attempt timeout, a flat retry count, and cancellation.

mod client;
mod credential;
#[cfg(any(test, feature = "test-util"))]
pub mod stub;

pub use client::{CompletionClient, GroqClient, GroqError};
pub use credential::{Credential, API_KEY_ENV};

use std::time::Duration;

use entex_core::{ModelConfig, DEFAULT_MODEL};

/// Upper bound on retries after the first attempt.
pub const MAX_RETRIES: u32 = 10;

/// Base URL of Groq's OpenAI-compatible API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Configuration for the Groq client.
#[derive(Debug, Clone, PartialEq)]
pub struct GroqConfig {
    /// Base URL; `/chat/completions` is appended.
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound for a single attempt.
    pub timeout: Duration,
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,
    /// Fixed pause between attempts.
    pub retry_delay: Duration,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: 500,
            timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl GroqConfig {
    /// Create a configuration from a variant's model settings.
    pub fn from_model_config(model: &ModelConfig) -> Self {
        Self {
            model: model.model.clone(),
            temperature: model.temperature,
            max_tokens: model.max_tokens,
            timeout: model.timeout(),
            max_retries: model.max_retries.min(MAX_RETRIES),
            ..Default::default()
        }
    }

    /// Set the API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of retries.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries.min(MAX_RETRIES);
        self
    }

    /// Set the pause between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base_url)
    }
}
