//! Server-rendered pages.

use std::fmt::Write as _;

use entex_core::Variant;

use crate::analyzer::{Outcome, Slot, Workbench};
use crate::presenter::escape_html;
use crate::profile::ExtractorProfile;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 60rem; margin: 2rem auto; padding: 0 1rem; color: #262730; }
textarea { width: 100%; box-sizing: border-box; font: inherit; padding: .5rem; }
button { padding: .4rem 1.2rem; margin-right: .5rem; }
button[disabled] { opacity: .5; }
table { border-collapse: collapse; margin: 1rem 0; }
th, td { border: 1px solid #d0d0d8; padding: .3rem .7rem; text-align: left; }
.warning { background: #fffae6; padding: .6rem 1rem; }
.error { background: #ffecec; padding: .6rem 1rem; }
.info { background: #e8f2ff; padding: .6rem 1rem; }
.success { background: #e9f9ee; padding: .6rem 1rem; }
"#;

// Keeps Analyze disabled while the input is blank.
const INPUT_SCRIPT: &str = r#"
const input = document.getElementById('text');
const analyze = document.getElementById('analyze');
input.addEventListener('input', () => { analyze.disabled = input.value.trim() === ''; });
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

/// Landing page linking to each variant.
pub fn render_index(workbench: &Workbench) -> String {
    let mut body = String::from("<h1>Entity extractors</h1>\n<ul>\n");
    for slot in workbench.slots() {
        let profile = slot.profile();
        let _ = writeln!(
            body,
            "<li><a href=\"/{}\">{}</a>: {}</li>",
            profile.variant.slug(),
            escape_html(profile.presentation.title),
            escape_html(profile.presentation.description)
        );
    }
    body.push_str("</ul>\n");
    layout("entex", &body)
}

/// One variant page: input form plus the outcome of the last interaction.
pub struct VariantPage<'a> {
    pub slot: &'a Slot,
    pub input: &'a str,
    pub outcome: Option<&'a Outcome>,
}

impl<'a> VariantPage<'a> {
    pub fn new(slot: &'a Slot) -> Self {
        Self {
            slot,
            input: "",
            outcome: None,
        }
    }

    pub fn with_input(mut self, input: &'a str) -> Self {
        self.input = input;
        self
    }

    pub fn with_outcome(mut self, outcome: &'a Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn render(&self) -> String {
        let profile = self.slot.profile();
        let spec = &profile.presentation;
        let slug = profile.variant.slug();
        let mut body = String::new();

        let _ = writeln!(body, "<h1>{}</h1>", escape_html(spec.title));
        let _ = writeln!(body, "<p>{}</p>", escape_html(spec.description));

        let unavailable = match self.slot {
            Slot::Unavailable { reason, .. } => {
                let _ = writeln!(body, "<div class=\"error\">{}</div>", escape_html(reason));
                true
            }
            Slot::Ready(_) => false,
        };

        let analyze_disabled = unavailable || self.input.trim().is_empty();
        let _ = writeln!(
            body,
            "<form method=\"post\" action=\"/{slug}/analyze\">\n\
             <label for=\"text\">{label}</label>\n\
             <textarea id=\"text\" name=\"text\" rows=\"8\" placeholder=\"{placeholder}\">\n{input}</textarea>\n\
             <p><button id=\"analyze\" type=\"submit\"{disabled}>Analyze</button>",
            slug = slug,
            label = escape_html(spec.input_label),
            placeholder = escape_html(spec.placeholder),
            input = escape_html(self.input),
            disabled = if analyze_disabled { " disabled" } else { "" },
        );
        if spec.clearable {
            let _ = write!(
                body,
                "<button type=\"submit\" formaction=\"/{}/clear\" formnovalidate>Clear</button>",
                slug
            );
        }
        body.push_str("</p>\n</form>\n");

        if let Some(outcome) = self.outcome {
            render_outcome(&mut body, profile, outcome);
        }

        if !unavailable {
            let _ = writeln!(body, "<script>{}</script>", INPUT_SCRIPT);
        }

        layout(spec.title, &body)
    }
}

fn render_outcome(body: &mut String, profile: &ExtractorProfile, outcome: &Outcome) {
    let spec = &profile.presentation;
    match outcome {
        Outcome::Warning { message } => {
            let _ = writeln!(body, "<div class=\"warning\">{}</div>", escape_html(message));
        }
        Outcome::Failure { message, hint } => {
            let _ = writeln!(body, "<div class=\"error\">{}</div>", escape_html(message));
            let _ = writeln!(body, "<div class=\"info\">{}</div>", escape_html(hint));
        }
        Outcome::Success {
            presentation,
            elapsed,
        } => {
            if spec.show_timing {
                let _ = writeln!(
                    body,
                    "<div class=\"success\">Processing completed in {:.2} seconds</div>",
                    elapsed.as_secs_f64()
                );
            }
            let _ = writeln!(body, "<h2>{}</h2>", escape_html(spec.result_heading));
            let _ = writeln!(
                body,
                "<section id=\"results\">\n{}</section>",
                presentation.render_html()
            );

            let download = presentation.download(spec);
            let _ = writeln!(
                body,
                "<p><a id=\"download\" download=\"{}\" href=\"{}\">Download Results</a></p>",
                escape_html(download.filename),
                escape_html(&download.data_url())
            );
        }
    }
}

/// Page for a path that names no variant.
pub fn render_not_found(name: &str) -> String {
    let variants: Vec<&str> = Variant::ALL.iter().map(|v| v.slug()).collect();
    layout(
        "Not found",
        &format!(
            "<h1>Not found</h1>\n<p>No extractor named <code>{}</code>. Try {}.</p>\n",
            escape_html(name),
            variants.join(" or ")
        ),
    )
}
