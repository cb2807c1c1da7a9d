//! Rendering a completion for the page and for download.
//!
//! The completion is shown and downloaded as received. Nothing here parses
//! the table into rows; markdown rendering is for display only.

use pulldown_cmark::{html, Event, Options, Parser};

use entex_core::PresentationSpec;

/// A successful completion, kept byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    completion: String,
}

impl Presentation {
    pub fn new(completion: impl Into<String>) -> Self {
        Self {
            completion: completion.into(),
        }
    }

    /// Markdown source as returned by the model.
    pub fn markdown(&self) -> &str {
        &self.completion
    }

    /// HTML for the results area.
    pub fn render_html(&self) -> String {
        render_markdown(&self.completion)
    }

    pub fn download<'a>(&'a self, spec: &PresentationSpec) -> Download<'a> {
        Download {
            filename: spec.download_filename,
            mime: spec.download_mime,
            body: &self.completion,
        }
    }

    /// Whether the completion contains a header row followed by a delimiter row.
    pub fn looks_like_table(&self) -> bool {
        let rows: Vec<&str> = self
            .completion
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with('|'))
            .collect();

        rows.windows(2).any(|pair| is_delimiter_row(pair[1]) && !is_delimiter_row(pair[0]))
    }
}

fn is_delimiter_row(line: &str) -> bool {
    line.contains('-') && line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

/// A download offer: file name, media type, and the exact bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Download<'a> {
    pub filename: &'static str,
    pub mime: &'static str,
    pub body: &'a str,
}

impl Download<'_> {
    /// A `data:` URL carrying the body percent-encoded, so the browser
    /// saves exactly these bytes.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};charset=utf-8,{}",
            self.mime,
            urlencoding::encode(self.body)
        )
    }
}

/// Markdown to HTML with table support. Raw HTML in the input is escaped.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, events);
    out
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a String cannot fail.
    let _ = pulldown_cmark_escape::escape_html(&mut out, text);
    out
}
