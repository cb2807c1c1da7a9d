//! Validated user input.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Please enter some text to analyze.")]
pub struct EmptyInputError;

/// Text submitted by the user for one interaction.
///
/// Guaranteed to contain at least one non-whitespace character. The text is
/// otherwise kept exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    raw_text: String,
}

impl Request {
    pub fn new(raw_text: impl Into<String>) -> Result<Self, EmptyInputError> {
        let raw_text = raw_text.into();
        if raw_text.trim().is_empty() {
            return Err(EmptyInputError);
        }
        Ok(Self { raw_text })
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}
