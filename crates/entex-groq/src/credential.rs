//! Provider credential.

use std::sync::Arc;

use crate::GroqError;

/// Environment variable holding the Groq API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// API key read once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct Credential(Arc<str>);

impl Credential {
    pub fn new(key: impl AsRef<str>) -> Result<Self, GroqError> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            return Err(GroqError::MissingApiKey);
        }
        Ok(Self(Arc::from(key)))
    }

    /// Read the key from `GROQ_API_KEY`.
    pub fn from_env() -> Result<Self, GroqError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the key through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GroqError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let key = lookup(API_KEY_ENV).ok_or(GroqError::MissingApiKey)?;
        Self::new(key)
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}
