//! Output rendering for streaming chat.
//!
//! This module provides the renderer seam between the conversation state
//! and the terminal: a trait notified once per streamed fragment, plus a
//! plain-text implementation with optional ANSI styling.

use std::io::{self, Stdout, Write};

/// ANSI escape code for dim text (used for informational notices).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering streaming output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Alternative front ends that subscribe to store changes
pub trait Renderer: Send {
    /// Print a fragment of response text.
    ///
    /// This is called incrementally, once per fragment, as tokens are
    /// streamed from the API.
    fn print_text(&mut self, text: &str);

    /// Called when a response is complete.
    ///
    /// Used to ensure proper newlines and cleanup after streaming.
    fn finish_response(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    line_start: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            use_color: true,
            line_start: true,
        }
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            line_start: true,
        }
    }

    /// Flushes stdout to ensure immediate display of streamed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_text(&mut self, text: &str) {
        print!("{text}");
        if let Some(last) = text.chars().last() {
            self.line_start = last == '\n';
        }
        self.flush();
    }

    fn finish_response(&mut self) {
        if !self.line_start {
            println!();
            self.line_start = true;
        }
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{ANSI_RED}error: {error}{ANSI_RESET}");
        } else {
            eprintln!("error: {error}");
        }
        self.line_start = true;
    }

    fn print_info(&mut self, info: &str) {
        if self.use_color {
            println!("{ANSI_DIM}{info}{ANSI_RESET}");
        } else {
            println!("{info}");
        }
        self.line_start = true;
        self.flush();
    }
}

/// Renderer that records what it was asked to print.
///
/// Useful for tests that assert on streamed output without capturing
/// stdout.
#[derive(Default)]
pub struct RecordingRenderer {
    /// Fragments passed to `print_text`, in order.
    pub fragments: Vec<String>,
    /// Errors passed to `print_error`, in order.
    pub errors: Vec<String>,
}

impl Renderer for RecordingRenderer {
    fn print_text(&mut self, text: &str) {
        self.fragments.push(text.to_string());
    }

    fn finish_response(&mut self) {}

    fn print_error(&mut self, error: &str) {
        self.errors.push(error.to_string());
    }

    fn print_info(&mut self, _info: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_renderer_construction() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);

        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn recording_renderer_captures_fragments() {
        let mut renderer = RecordingRenderer::default();
        renderer.print_text("Hel");
        renderer.print_text("lo");
        renderer.print_error("boom");
        assert_eq!(renderer.fragments, vec!["Hel", "lo"]);
        assert_eq!(renderer.errors, vec!["boom"]);
    }
}
