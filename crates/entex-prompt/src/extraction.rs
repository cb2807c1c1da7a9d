//! Extraction prompt.

use entex_core::Request;

use crate::{Prompt, PromptTemplate};

/// One user request bound to a variant's template.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionPrompt<'a> {
    pub template: &'a PromptTemplate,
    pub request: &'a Request,
}

impl<'a> ExtractionPrompt<'a> {
    pub fn new(template: &'a PromptTemplate, request: &'a Request) -> Self {
        Self { template, request }
    }
}

impl Prompt for ExtractionPrompt<'_> {
    fn render(&self) -> String {
        self.template.format(self.request)
    }
}

#[cfg(test)]
mod tests {
    use entex_core::Variant;

    use super::*;

    const SAMPLES: &[&str] = &[
        "Patient reports chest pain after taking ibuprofen 400mg.",
        "Satya Nadella of Microsoft spoke in Redmond, Washington.",
        "x",
        "  leading and trailing whitespace  ",
        "multi\nline\r\ninput",
        "unicode: 東京で発熱と咳",
        "| already | a | table |",
        "{}{{}}",
    ];

    #[test]
    fn test_render_is_prefix_text_suffix() {
        for variant in Variant::ALL {
            let template = PromptTemplate::builtin(variant);
            for sample in SAMPLES {
                let request = Request::new(*sample).unwrap();
                let rendered = ExtractionPrompt::new(&template, &request).render();

                assert!(rendered.starts_with(template.prefix()));
                assert!(rendered.ends_with(template.suffix()));
                let middle =
                    &rendered[template.prefix().len()..rendered.len() - template.suffix().len()];
                assert_eq!(middle, *sample);
            }
        }
    }

    #[test]
    fn test_render_contains_text_exactly_once() {
        for variant in Variant::ALL {
            let template = PromptTemplate::builtin(variant);
            for sample in SAMPLES.iter().filter(|s| !template.source().contains(**s)) {
                let request = Request::new(*sample).unwrap();
                let rendered = ExtractionPrompt::new(&template, &request).render();
                assert_eq!(rendered.matches(*sample).count(), 1, "sample {:?}", sample);
            }
        }
    }

    #[test]
    fn test_entities_prompt_lists_columns() {
        let template = PromptTemplate::builtin(Variant::Entities);
        let request = Request::new("Tim Cook from Apple").unwrap();
        let rendered = ExtractionPrompt::new(&template, &request).render();
        assert!(rendered.contains("| Name | Entity_Type | City | Country | Country_Code |"));
        assert!(rendered.contains("Input text: Tim Cook from Apple\n"));
    }
}
