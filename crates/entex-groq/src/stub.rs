//! In-process completion clients for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{CompletionClient, GroqError};

/// Returns the same completion for every prompt.
pub struct StaticClient {
    completion: String,
    calls: AtomicUsize,
}

impl StaticClient {
    pub fn new(completion: impl Into<String>) -> Self {
        Self {
            completion: completion.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of prompts received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for StaticClient {
    async fn complete(&self, _prompt: &str, cancel: &CancellationToken) -> Result<String, GroqError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if cancel.is_cancelled() {
            return Err(GroqError::Cancelled);
        }
        Ok(self.completion.clone())
    }

    fn model(&self) -> &str {
        "static"
    }
}

/// Replays queued results in order and records the prompts it saw.
pub struct ScriptedClient {
    script: Mutex<VecDeque<Result<String, GroqError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(script: impl IntoIterator<Item = Result<String, GroqError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str, cancel: &CancellationToken) -> Result<String, GroqError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if cancel.is_cancelled() {
            return Err(GroqError::Cancelled);
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| Err(GroqError::ParseError("Script exhausted".to_string())))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
