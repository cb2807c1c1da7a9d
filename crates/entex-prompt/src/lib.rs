//! Prompt templates for entex entity extraction.
//!
//! Each variant owns one template with a single `{text}` substitution point.
//! The user's text is embedded verbatim; nothing is escaped.
//!
//! # Example
//!
//! ```rust
//! use entex_core::{Request, Variant};
//! use entex_prompt::{ExtractionPrompt, Prompt, PromptTemplate};
//!
//! let template = PromptTemplate::builtin(Variant::Medical);
//! let request = Request::new("Started metformin for type 2 diabetes").unwrap();
//! let prompt = ExtractionPrompt::new(&template, &request);
//!
//! assert!(prompt.render().contains("Started metformin for type 2 diabetes"));
//! ```

mod extraction;
mod template;
mod templates;
mod traits;

pub use extraction::ExtractionPrompt;
pub use template::{PromptTemplate, TemplateError, PLACEHOLDER};
pub use templates::{ENTITIES_TEMPLATE, MEDICAL_TEMPLATE};
pub use traits::Prompt;
