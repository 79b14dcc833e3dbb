//! Canonical output mapping and the renderers that consume it.
//!
//! Every command normalizes its backend responses into one order-preserving
//! nested mapping, wrapped one level deep under the command name. The three
//! renderers (console tree, JSON, clipboard markdown) consume that identical
//! mapping and differ only in presentation: same keys, same values, same
//! nesting. The clipboard variant is the console tree captured to a buffer
//! with the styling sequences stripped.

use crate::error::DamonError;
use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde_json::{Map, Value};

/// Canonical ordered mapping: section names to scalars, sequences, or
/// nested mappings. Insertion order is the authoritative display order.
pub type OutputMap = Map<String, Value>;

/// Destination for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Colorized console tree on stdout (default).
    Terminal,
    /// Order-preserving JSON on stdout.
    Json,
    /// Console tree with styling stripped, placed on the clipboard.
    Copy,
}

/// Wrap a command's sections under the command name. The console renderer
/// never prints this outermost key; the JSON form keeps it.
pub fn package_output(command: &str, sections: Value) -> OutputMap {
    let mut root = Map::new();
    root.insert(command.to_string(), sections);
    root
}

/// Serialize the canonical mapping as pretty JSON, preserving key order.
pub fn render_json(output: &OutputMap) -> Result<String, DamonError> {
    serde_json::to_string_pretty(output)
        .map_err(|e| DamonError::Output(format!("Failed to serialize output: {}", e)))
}

/// Render the canonical mapping as a colorized console tree.
///
/// Nested mappings and sequences print their key as a styled section
/// header and recurse with increased indentation; scalar fields print as
/// `- key: value`; sequence elements print as `- value`. The outermost
/// level's keys are skipped so the command-name wrapper adds no header.
pub fn render_terminal(output: &OutputMap) -> String {
    let mut out = String::new();
    for value in output.values() {
        render_value(&mut out, value, 0);
    }
    out
}

/// Console tree with styling stripped: plain markdown-style lists suitable
/// for pasting.
pub fn render_markdown(output: &OutputMap) -> String {
    strip_ansi(&render_terminal(output))
}

fn render_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match child {
                    Value::Object(_) | Value::Array(_) => {
                        // Blank line between top-level sections.
                        if depth == 0 && !out.is_empty() {
                            out.push('\n');
                        }
                        out.push_str(&indent(depth));
                        out.push_str(&format!("{}\n", format!("{}:", key).magenta()));
                        render_value(out, child, depth + 1);
                    }
                    scalar => {
                        out.push_str(&indent(depth));
                        out.push_str(&format!(
                            "{}{}\n",
                            format!("- {}: ", key).yellow(),
                            scalar_text(scalar).green()
                        ));
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(_) | Value::Array(_) => render_value(out, item, depth),
                    scalar => {
                        out.push_str(&indent(depth));
                        out.push_str(&format!("{}\n", format!("- {}", scalar_text(scalar)).cyan()));
                    }
                }
            }
        }
        scalar => {
            out.push_str(&indent(depth));
            out.push_str(&format!("{}\n", format!("- {}", scalar_text(scalar)).cyan()));
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Remove ANSI escape sequences from captured console output.
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip through the final byte of the escape sequence.
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Place text on the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), DamonError> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| DamonError::Output(format!("Clipboard unavailable: {}", e)))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| DamonError::Output(format!("Clipboard write failed: {}", e)))
}

const SIZE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Human-readable byte size with 1024-based prefixes, two decimal places.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, SIZE_UNITS[unit])
}

/// Elapsed duration in seconds as `H:MM:SS`.
pub fn format_elapsed(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Unix timestamp (seconds) as `YYYY-MM-DD HH:MM:SS`, or `None` when the
/// value is out of range.
pub fn format_timestamp(seconds: f64) -> Option<String> {
    chrono::DateTime::from_timestamp(seconds as i64, 0)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
}
