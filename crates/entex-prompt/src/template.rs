//! Single-placeholder prompt templates.

use std::sync::Arc;

use entex_core::{Request, Variant};
use thiserror::Error;

use crate::templates::{ENTITIES_TEMPLATE, MEDICAL_TEMPLATE};

/// The substitution point every template must contain exactly once.
pub const PLACEHOLDER: &str = "{text}";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template has no {{text}} substitution point")]
    MissingPlaceholder,

    #[error("Template has {count} {{text}} substitution points, expected exactly one")]
    RepeatedPlaceholder { count: usize },
}

/// A prompt template split around its substitution point.
///
/// Cloning is cheap; the halves are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    prefix: Arc<str>,
    suffix: Arc<str>,
}

impl PromptTemplate {
    /// Parse a template, requiring exactly one `{text}`.
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        let count = template.matches(PLACEHOLDER).count();
        match count {
            0 => Err(TemplateError::MissingPlaceholder),
            1 => {
                let (prefix, suffix) = template
                    .split_once(PLACEHOLDER)
                    .ok_or(TemplateError::MissingPlaceholder)?;
                Ok(Self {
                    prefix: Arc::from(prefix),
                    suffix: Arc::from(suffix),
                })
            }
            count => Err(TemplateError::RepeatedPlaceholder { count }),
        }
    }

    /// The built-in template for a variant.
    #[must_use]
    pub fn builtin(variant: Variant) -> Self {
        let source = match variant {
            Variant::Medical => MEDICAL_TEMPLATE,
            Variant::Entities => ENTITIES_TEMPLATE,
        };
        // Built-in templates are checked by the tests below.
        let (prefix, suffix) = source.split_once(PLACEHOLDER).unwrap_or((source, ""));
        Self {
            prefix: Arc::from(prefix),
            suffix: Arc::from(suffix),
        }
    }

    /// Text before the substitution point.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Text after the substitution point.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Embed a validated request.
    #[must_use]
    pub fn format(&self, request: &Request) -> String {
        let text = request.raw_text();
        let mut out = String::with_capacity(self.prefix.len() + text.len() + self.suffix.len());
        out.push_str(&self.prefix);
        out.push_str(text);
        out.push_str(&self.suffix);
        out
    }

    /// The template with its placeholder restored.
    #[must_use]
    pub fn source(&self) -> String {
        format!("{}{}{}", self.prefix, PLACEHOLDER, self.suffix)
    }
}
