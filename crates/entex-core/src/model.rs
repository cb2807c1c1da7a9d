//! Model settings for a chat-completion request.

use std::time::Duration;

use crate::Variant;

/// Model used by both variants unless overridden.
pub const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";

/// Decoding and transport settings for one variant.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl ModelConfig {
    /// Built-in settings for a variant.
    #[must_use]
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Medical => Self {
                model: DEFAULT_MODEL.to_string(),
                temperature: 0.0,
                max_tokens: 500,
                timeout_secs: 10,
                max_retries: 2,
            },
            Variant::Entities => Self {
                model: DEFAULT_MODEL.to_string(),
                temperature: 0.0,
                max_tokens: 1000,
                timeout_secs: 15,
                max_retries: 3,
            },
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
