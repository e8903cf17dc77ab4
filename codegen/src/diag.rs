// diag.rs — Unified diagnostics model
//
// Provides the diagnostic type reported by the generation driver. Lowering
// and expansion fail with a typed `CodegenError`; the driver converts each
// failure into a `Diagnostic` so callers can report every federate's
// problems in one pass.
//
// Preconditions: none (types only).
// Postconditions: none (types only).
// Failure modes: none.
// Side effects: none.

use std::fmt;

// ── Diagnostic code ──────────────────────────────────────────────────────

/// A stable diagnostic code (e.g., `E0101`).
///
/// Once assigned, a code must never be reassigned to a different meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagCode(pub &'static str);

impl fmt::Display for DiagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub mod codes {
    use super::DiagCode;

    /// Reference names a non-port where a port is required.
    pub const E0101: DiagCode = DiagCode("E0101");
    /// Reference names an unknown variable.
    pub const E0102: DiagCode = DiagCode("E0102");
    /// Instantiation names an unknown reactor class.
    pub const E0103: DiagCode = DiagCode("E0103");
    /// Reference names an unknown container.
    pub const E0104: DiagCode = DiagCode("E0104");
    /// Bank or multiport width cannot be resolved.
    pub const E0105: DiagCode = DiagCode("E0105");
    /// Instantiation nesting exceeds the depth limit.
    pub const E0106: DiagCode = DiagCode("E0106");
    /// Program declares no main reactor.
    pub const E0107: DiagCode = DiagCode("E0107");
    /// Bank width does not fit in 32 bits.
    pub const E0108: DiagCode = DiagCode("E0108");
}

// ── Severity level ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagLevel {
    Error,
    Warning,
}

// ── Diagnostic ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: Option<DiagCode>,
    pub level: DiagLevel,
    pub message: String,
    pub hint: Option<String>,
    /// Federate, instance, or reference the diagnostic is about.
    pub subject: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with no code, hint, or subject.
    pub fn new(level: DiagLevel, message: impl Into<String>) -> Self {
        Self {
            code: None,
            level,
            message: message.into(),
            hint: None,
            subject: None,
        }
    }

    /// Attach a stable diagnostic code.
    pub fn with_code(mut self, code: DiagCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagLevel::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagLevel::Error => "error",
            DiagLevel::Warning => "warning",
        };
        if let Some(code) = &self.code {
            write!(f, "{}[{}]: {}", level, code, self.message)?;
        } else {
            write!(f, "{}: {}", level, self.message)?;
        }
        if let Some(subject) = &self.subject {
            write!(f, "\n  --> {}", subject)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}
