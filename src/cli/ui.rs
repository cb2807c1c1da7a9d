//! Terminal output for the CLI: cargo-style status lines and a spinner.

/// ANSI color codes for terminal styling
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const GREEN: &str = "\x1b[32m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
}

/// Check if colors should be enabled
pub fn colors_enabled() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
        return false;
    }
    atty::is(atty::Stream::Stderr)
}

/// Get terminal width, defaulting to 80
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Shorten text to `max_chars` characters, ending with an ellipsis when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    if flat.chars().count() <= max_chars {
        return flat;
    }
    if max_chars <= 3 {
        return "...".to_string();
    }
    let kept: String = flat.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}

/// Status line printer in cargo's style: `   Analyzing  medical`
pub struct StatusPrinter {
    use_colors: bool,
}

impl StatusPrinter {
    pub fn new() -> Self {
        Self {
            use_colors: colors_enabled(),
        }
    }

    fn styled(&self, color: &str, bold: bool, text: &str) -> String {
        if self.use_colors {
            let bold_code = if bold { colors::BOLD } else { "" };
            format!("{}{}{}{}", bold_code, color, text, colors::RESET)
        } else {
            text.to_string()
        }
    }

    fn line(&self, color: &str, keyword: &str, message: &str) {
        let keyword_styled = self.styled(color, true, &format!("{:>12}", keyword));
        eprintln!("{} {}", keyword_styled, message);
    }

    pub fn status(&self, keyword: &str, message: &str) {
        self.line(colors::BRIGHT_GREEN, keyword, message);
    }

    pub fn info(&self, keyword: &str, message: &str) {
        self.line(colors::BRIGHT_CYAN, keyword, message);
    }

    pub fn warning(&self, keyword: &str, message: &str) {
        self.line(colors::BRIGHT_YELLOW, keyword, message);
    }

    pub fn error(&self, keyword: &str, message: &str) {
        self.line(colors::BRIGHT_RED, keyword, message);
    }

    pub fn success(&self, keyword: &str, message: &str) {
        self.line(colors::GREEN, keyword, message);
    }

    /// Print a section header underlined to the terminal width.
    pub fn section(&self, title: &str) {
        let rule_len = terminal_width().min(title.chars().count().max(40));
        eprintln!();
        eprintln!("{}", self.styled(colors::BOLD, false, title));
        eprintln!("{}", self.styled(colors::DIM, false, &"─".repeat(rule_len)));
    }

    pub fn kv(&self, key: &str, value: &str) {
        let key_styled = self.styled(colors::DIM, false, key);
        eprintln!("  {}: {}", key_styled, value);
    }
}

impl Default for StatusPrinter {
    fn default() -> Self {
        Self::new()
    }
}

pub mod progress {
    use std::time::Duration;

    use indicatif::{ProgressBar, ProgressStyle};

    /// Create a ticking spinner for a request of unknown length
    pub fn create_spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
