//! Terminal output formatting.
//!
//! Handlers receive an [`Output`] built from the global CLI flags and print
//! through it. JSON mode emits one `{"type", "payload"}` object per line for
//! scripting; quiet mode drops everything except warnings and errors.

use std::fmt::Display;

use owo_colors::OwoColorize;
use serde_json::json;

/// Presentation settings for one CLI invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Output {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Verbosity level (0 = normal, 1+ = increasingly verbose).
    pub verbose: u8,
}

fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!(
        "{}",
        json!({
            "type": kind,
            "payload": payload,
        })
    );
}

impl Output {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    #[must_use]
    pub const fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Regular (non-JSON) output is suppressed.
    const fn suppressed(&self) -> bool {
        !self.json && self.quiet
    }

    /// Print the application header with name and version.
    pub fn header(&self, version: &str) {
        if self.json {
            emit_json_line("header", json!({ "app": "stocklive", "version": version }));
            return;
        }
        if self.suppressed() {
            return;
        }
        println!("{} {}", "stocklive".bold(), version.dimmed());
        println!();
    }

    /// Print a labeled value.
    pub fn field(&self, label: &str, value: impl Display) {
        let value = value.to_string();
        if self.json {
            emit_json_line("field", json!({ "label": label, "value": value }));
            return;
        }
        if self.suppressed() {
            return;
        }
        println!("  {:<14} {}", label.dimmed(), value);
    }

    pub fn success(&self, message: &str) {
        if self.json {
            emit_json_line("success", json!({ "message": message }));
            return;
        }
        if self.suppressed() {
            return;
        }
        println!("  {} {}", "✓".green(), message);
    }

    pub fn warning(&self, message: &str) {
        if self.json {
            emit_json_line("warning", json!({ "message": message }));
            return;
        }
        println!("  {} {}", "⚠".yellow(), message);
    }

    /// Print an error line to stderr.
    pub fn error(&self, message: &str) {
        if self.json {
            eprintln!(
                "{}",
                json!({
                    "type": "error",
                    "payload": { "message": message },
                })
            );
            return;
        }
        eprintln!("  {} {}", "×".red(), message);
    }

    pub fn section(&self, title: &str) {
        if self.json {
            emit_json_line("section", json!({ "title": title }));
            return;
        }
        if self.suppressed() {
            return;
        }
        println!();
        println!("{}", title.bold());
    }

    pub fn note(&self, message: &str) {
        if self.json {
            emit_json_line("note", json!({ "message": message }));
            return;
        }
        if self.suppressed() {
            return;
        }
        println!("  {}", message.dimmed());
    }

    /// Print multiple lines of content, each indented.
    pub fn lines(&self, content: &str) {
        if self.json {
            emit_json_line("lines", json!({ "content": content }));
            return;
        }
        if self.suppressed() {
            return;
        }
        for line in content.lines() {
            println!("  {line}");
        }
    }

    /// Emit a JSON value directly (for commands with their own JSON shape).
    pub fn json_output(&self, value: serde_json::Value) {
        println!("{value}");
    }

    /// Color a signed value green or red; plain in JSON mode.
    #[must_use]
    pub fn signed(&self, value: impl Display, negative: bool) -> String {
        let value = value.to_string();
        if self.json {
            value
        } else if negative {
            format!("{}", value.red())
        } else {
            format!("{}", value.green())
        }
    }

    /// Dimmed text; plain in JSON mode.
    #[must_use]
    pub fn muted(&self, value: impl Display) -> String {
        let value = value.to_string();
        if self.json {
            return value;
        }
        format!("{}", value.dimmed())
    }
}
