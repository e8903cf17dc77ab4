// emit.rs — Indentation-aware code builder and generation options
//
// `CodeBuilder` accumulates target text line by line at a current
// indentation level. Multi-line fragments are re-indented line by line so
// nested blocks (preambles, reaction bodies) land at the right depth.

use std::fmt::Write as _;

use serde::Deserialize;

/// Marker contained in the class name of synthesized delay reactors.
pub const GEN_DELAY_CLASS_NAME: &str = "_lf_GenDelay";

// ── Options ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodegenOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Classes whose name contains this marker are never emitted.
    pub delay_class_marker: String,
    /// Emit a comment line above each class header.
    pub class_comments: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            delay_class_marker: GEN_DELAY_CLASS_NAME.to_string(),
            class_comments: true,
        }
    }
}

impl CodegenOptions {
    pub fn is_delay_class(&self, class_name: &str) -> bool {
        !self.delay_class_marker.is_empty() && class_name.contains(&self.delay_class_marker)
    }
}

// ── Code builder ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CodeBuilder {
    out: String,
    level: usize,
    unit: String,
}

impl CodeBuilder {
    pub fn new(indent_width: usize) -> Self {
        Self {
            out: String::with_capacity(1024),
            level: 0,
            unit: " ".repeat(indent_width),
        }
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn unindent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Append `text` at the current level, one output line per input line.
    /// Empty input lines stay empty (no trailing whitespace).
    pub fn line(&mut self, text: &str) {
        for line in text.lines() {
            if line.trim().is_empty() {
                self.out.push('\n');
            } else {
                let _ = writeln!(self.out, "{}{}", self.unit.repeat(self.level), line);
            }
        }
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Remove the whitespace prefix shared by all non-blank lines and trim blank
/// lines at both ends. The prefix is compared as text, so mixed indentation
/// characters only strip what every line actually shares.
pub fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };
    let body = &lines[start..=end];
    let common = body
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| leading_whitespace(l))
        .reduce(common_prefix)
        .unwrap_or("");
    body.iter()
        .map(|l| {
            if l.trim().is_empty() {
                ""
            } else {
                l.strip_prefix(common).unwrap_or(l)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Longest common prefix of `a` and `b`, cut on a char boundary of `a`.
fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}

// ── Tests ───────────────────────────────────────────────────────────────────
