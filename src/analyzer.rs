use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use entex_core::{Request, Variant};
use entex_groq::{CompletionClient, Credential, GroqClient};
use entex_prompt::{ExtractionPrompt, Prompt};

use crate::config::{ConfigError, EntexConfig};
use crate::presenter::Presentation;
use crate::profile::ExtractorProfile;

/// What one Analyze interaction ended with.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Input was blank; no request was sent.
    Warning { message: String },
    Success {
        presentation: Presentation,
        elapsed: Duration,
    },
    Failure {
        message: String,
        hint: &'static str,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// A variant profile paired with the client that serves it.
#[derive(Clone)]
pub struct Extractor {
    profile: Arc<ExtractorProfile>,
    client: Arc<dyn CompletionClient>,
}

impl Extractor {
    pub fn new(profile: ExtractorProfile, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            profile: Arc::new(profile),
            client,
        }
    }

    pub fn profile(&self) -> &ExtractorProfile {
        &self.profile
    }

    /// Run one extraction. Every error ends up in the returned outcome.
    pub async fn analyze(&self, raw_text: &str, cancel: &CancellationToken) -> Outcome {
        let request = match Request::new(raw_text) {
            Ok(request) => request,
            Err(e) => {
                return Outcome::Warning {
                    message: e.to_string(),
                };
            }
        };

        let prompt = ExtractionPrompt::new(&self.profile.template, &request).render();
        let variant = self.profile.variant;
        info!(
            "Analyzing {} chars with {} ({})",
            request.raw_text().len(),
            self.client.model(),
            variant
        );

        let start_time = Instant::now();
        let result = self.client.complete(&prompt, cancel).await;
        let elapsed = start_time.elapsed();

        match result {
            Ok(completion) => {
                let presentation = Presentation::new(completion);
                if !presentation.looks_like_table() {
                    warn!("Completion for {} does not look like a markdown table", variant);
                }
                info!("Extraction finished in {:.2}s", elapsed.as_secs_f64());
                Outcome::Success {
                    presentation,
                    elapsed,
                }
            }
            Err(e) => {
                warn!("Extraction for {} failed: {}", variant, e);
                let spec = &self.profile.presentation;
                Outcome::Failure {
                    message: format!("{}: {}", spec.failure_prefix, e),
                    hint: spec.failure_hint,
                }
            }
        }
    }
}

/// A variant either ready to serve or disabled because its client failed to start.
#[derive(Clone)]
pub enum Slot {
    Ready(Extractor),
    Unavailable {
        profile: Arc<ExtractorProfile>,
        reason: String,
    },
}

impl Slot {
    pub fn profile(&self) -> &ExtractorProfile {
        match self {
            Slot::Ready(extractor) => extractor.profile(),
            Slot::Unavailable { profile, .. } => profile,
        }
    }
}

/// One slot per variant, built once at startup.
#[derive(Clone)]
pub struct Workbench {
    medical: Slot,
    entities: Slot,
}

impl Workbench {
    pub fn new(medical: Slot, entities: Slot) -> Self {
        Self { medical, entities }
    }

    /// Build a Groq-backed extractor for each variant.
    ///
    /// Profile errors are fatal. A client that fails to initialize only
    /// disables its own variant.
    pub fn build(config: &EntexConfig, credential: &Credential) -> Result<Self, ConfigError> {
        Ok(Self::new(
            build_slot(config, credential, Variant::Medical)?,
            build_slot(config, credential, Variant::Entities)?,
        ))
    }

    /// Every variant served by the same client. Useful for tests and offline runs.
    pub fn with_client(client: Arc<dyn CompletionClient>) -> Self {
        Self::new(
            Slot::Ready(Extractor::new(
                ExtractorProfile::builtin(Variant::Medical),
                client.clone(),
            )),
            Slot::Ready(Extractor::new(
                ExtractorProfile::builtin(Variant::Entities),
                client,
            )),
        )
    }

    pub fn slot(&self, variant: Variant) -> &Slot {
        match variant {
            Variant::Medical => &self.medical,
            Variant::Entities => &self.entities,
        }
    }

    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        [&self.medical, &self.entities].into_iter()
    }
}

fn build_slot(
    config: &EntexConfig,
    credential: &Credential,
    variant: Variant,
) -> Result<Slot, ConfigError> {
    let profile = config.profile(variant)?;
    let groq_config = config.groq_config(&profile);
    let slot = match GroqClient::new(groq_config, credential.clone()) {
        Ok(client) => Slot::Ready(Extractor::new(profile, Arc::new(client))),
        Err(e) => {
            warn!("Disabling {}: {}", variant, e);
            Slot::Unavailable {
                profile: Arc::new(profile),
                reason: format!("Failed to initialize Groq client: {}", e),
            }
        }
    };
    Ok(slot)
}
