use entex_core::{ModelConfig, PresentationSpec, Variant};
use entex_prompt::PromptTemplate;

/// Everything fixed about one variant once startup is done.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorProfile {
    pub variant: Variant,
    pub template: PromptTemplate,
    pub model: ModelConfig,
    pub presentation: PresentationSpec,
}

impl ExtractorProfile {
    /// Built-in profile with no configuration applied.
    pub fn builtin(variant: Variant) -> Self {
        Self {
            variant,
            template: PromptTemplate::builtin(variant),
            model: ModelConfig::for_variant(variant),
            presentation: PresentationSpec::for_variant(variant),
        }
    }
}
