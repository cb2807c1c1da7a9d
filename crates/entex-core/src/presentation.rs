//! Page and download strings for each variant.

use crate::Variant;

/// Everything a page needs to present one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationSpec {
    pub title: &'static str,
    pub description: &'static str,
    pub input_label: &'static str,
    pub placeholder: &'static str,
    pub result_heading: &'static str,
    pub download_filename: &'static str,
    pub download_mime: &'static str,
    /// Whether the page offers a Clear action.
    pub clearable: bool,
    /// Whether the page reports how long the model call took.
    pub show_timing: bool,
    /// Prefix placed before the raw error text on failure.
    pub failure_prefix: &'static str,
    pub failure_hint: &'static str,
}

impl PresentationSpec {
    #[must_use]
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Medical => Self {
                title: "Medical Entity Extractor",
                description: "This tool extracts medical entities from text using the Groq LLM API.",
                input_label: "Enter the text to analyze:",
                placeholder: "Type your tweet or text here...",
                result_heading: "Extracted Medical Entities",
                download_filename: "medical_entities.txt",
                download_mime: "text/plain",
                clearable: false,
                show_timing: false,
                failure_prefix: "Error processing text",
                failure_hint: "Please try again or check your API configuration.",
            },
            Variant::Entities => Self {
                title: "Advanced Entity Extractor",
                description: "This tool extracts named entities from text and identifies associated \
                              geographic information. Enter your text below to analyze people, \
                              organizations, and locations.",
                input_label: "Enter text to analyze:",
                placeholder: "Example: Tim Cook from Apple in Cupertino, USA announced...",
                result_heading: "Extracted Entities",
                download_filename: "extracted_entities.md",
                download_mime: "text/markdown",
                clearable: true,
                show_timing: true,
                failure_prefix: "Error during processing",
                failure_hint: "Please try again or check your input text.",
            },
        }
    }
}
