//! Chat-completion client with timeout, flat retries and cancellation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{Credential, GroqConfig};

/// Errors that can occur while requesting a completion.
#[derive(Error, Debug)]
pub enum GroqError {
    #[error("GROQ_API_KEY not found. Please check your environment variables.")]
    MissingApiKey,

    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(#[source] reqwest::Error),

    #[error("Failed to make HTTP request: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse completion response: {0}")]
    ParseError(String),

    #[error("Request failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<GroqError> },

    #[error("Request was cancelled")]
    Cancelled,
}

impl GroqError {
    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GroqError::Timeout { .. } => true,
            GroqError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            GroqError::ApiError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Something that turns a prompt into completion text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request a completion, honoring `cancel` until the result is ready.
    async fn complete(&self, prompt: &str, cancel: &CancellationToken) -> Result<String, GroqError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    id: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageResponse,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for Groq's OpenAI-compatible chat-completion endpoint.
pub struct GroqClient {
    config: GroqConfig,
    credential: Credential,
    http_client: HttpClient,
}

impl GroqClient {
    /// Build the HTTP client. Fails only if the TLS backend cannot start.
    pub fn new(config: GroqConfig, credential: Credential) -> Result<Self, GroqError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GroqError::ClientInit)?;

        Ok(Self {
            config,
            credential,
            http_client,
        })
    }

    /// One attempt, bounded by the configured timeout.
    async fn execute(&self, prompt: &str) -> Result<String, GroqError> {
        timeout(self.config.timeout, self.call_api(prompt))
            .await
            .map_err(|_| GroqError::Timeout {
                timeout: self.config.timeout,
            })?
    }

    async fn call_api(&self, prompt: &str) -> Result<String, GroqError> {
        let start_time = Instant::now();

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!("Sending request to {}", self.config.completions_url());

        let response = self
            .http_client
            .post(self.config.completions_url())
            .header("Authorization", self.credential.bearer())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(GroqError::ApiError {
                status: status.as_u16(),
                message: api_error_message(&response_text),
            });
        }

        let content = extract_content(&response_text)?;
        debug!(
            "Completion received in {}ms ({} chars)",
            start_time.elapsed().as_millis(),
            content.len()
        );
        Ok(content)
    }

    fn classify(&self, error: reqwest::Error) -> GroqError {
        if error.is_timeout() {
            GroqError::Timeout {
                timeout: self.config.timeout,
            }
        } else {
            GroqError::Http(error)
        }
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, prompt: &str, cancel: &CancellationToken) -> Result<String, GroqError> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let result = tokio::select! {
                _ = cancel.cancelled() => return Err(GroqError::Cancelled),
                result = self.execute(prompt) => result,
            };

            match result {
                Ok(content) => {
                    info!("Completion succeeded on attempt {}", attempt);
                    return Ok(content);
                }
                Err(e) if e.is_transient() && attempt <= self.config.max_retries => {
                    warn!(
                        "Attempt {} failed: {}. Retrying after {:?}",
                        attempt, e, self.config.retry_delay
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(GroqError::Cancelled),
                        _ = tokio::time::sleep(self.config.retry_delay) => {}
                    }
                }
                Err(e) if e.is_transient() && attempt > 1 => {
                    error!("Completion failed after {} attempts: {}", attempt, e);
                    return Err(GroqError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    error!("Completion failed: {}", e);
                    return Err(e);
                }
            }
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Pull the first choice's text out of a response body.
fn extract_content(response_text: &str) -> Result<String, GroqError> {
    let api_response: ChatCompletionResponse = serde_json::from_str(response_text)
        .map_err(|e| GroqError::ParseError(format!("Failed to parse API response: {}", e)))?;

    if let Some(usage) = &api_response.usage {
        debug!(
            "Request {} used {} prompt / {} completion tokens",
            api_response.id.as_deref().unwrap_or("-"),
            usage.prompt_tokens,
            usage.completion_tokens
        );
    }

    api_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GroqError::ParseError("No choices in API response".to_string()))?
        .message
        .content
        .ok_or_else(|| GroqError::ParseError("Completion has no content".to_string()))
}

/// Best-effort message from an error body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
        Err(_) => body.chars().take(500).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "| A | B | C |"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        assert_eq!(extract_content(body).unwrap(), "| A | B | C |");
    }

    #[test]
    fn test_extract_content_no_choices() {
        let err = extract_content(r#"{"choices": []}"#).unwrap_err();
        assert!(err.to_string().contains("No choices"));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_extract_content_null_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        assert!(matches!(extract_content(body), Err(GroqError::ParseError(_))));
    }

    #[test]
    fn test_extract_content_malformed() {
        assert!(matches!(extract_content("<html>"), Err(GroqError::ParseError(_))));
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"message": "Invalid API Key", "type": "invalid_request_error"}}"#;
        assert_eq!(api_error_message(body), "Invalid API Key");
        assert_eq!(api_error_message(""), "Unknown error");
        assert_eq!(api_error_message("bad gateway"), "bad gateway");
    }

    #[test]
    fn test_transient_classification() {
        let api = |status| GroqError::ApiError {
            status,
            message: String::new(),
        };
        assert!(api(429).is_transient());
        assert!(api(503).is_transient());
        assert!(!api(401).is_transient());
        assert!(!api(400).is_transient());
        assert!(GroqError::Timeout {
            timeout: Duration::from_secs(1)
        }
        .is_transient());
        assert!(!GroqError::Cancelled.is_transient());
        assert!(!GroqError::MissingApiKey.is_transient());
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "mixtral-8x7b-32768",
            messages: [Message {
                role: "user",
                content: "prompt",
            }],
            temperature: 0.0,
            max_tokens: 500,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "mixtral-8x7b-32768");
        assert_eq!(value["temperature"], 0.0);
        assert_eq!(value["max_tokens"], 500);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "prompt");
    }

    #[test]
    fn test_client_builds() {
        let credential = Credential::new("gsk_test").unwrap();
        let client = GroqClient::new(GroqConfig::default(), credential).unwrap();
        assert_eq!(client.model(), "mixtral-8x7b-32768");
    }
}
