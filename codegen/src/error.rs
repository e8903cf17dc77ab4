// error.rs — Typed failures surfaced by the code-generation core
//
// Every variant is a violated precondition from an upstream collaborator
// (model construction, federation assignment) or a misuse of the lowering
// API. None of them are recoverable inside the core; callers convert them
// into diagnostics (see `diag::Diagnostic`).

use thiserror::Error;

use crate::diag::{codes, DiagLevel, Diagnostic};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// A port was required but the reference names an action or a timer.
    #[error("'{reference}' refers to {found}, not a port")]
    InvalidReferenceKind {
        reference: String,
        found: &'static str,
    },

    #[error("no variable named '{variable}' in reactor '{reactor}'")]
    UnresolvedVariable { variable: String, reactor: String },

    #[error("no reactor class named '{0}'")]
    UnknownReactor(String),

    #[error("no instantiation named '{container}' in reactor '{reactor}'")]
    UnknownContainer { container: String, reactor: String },

    #[error("cannot resolve width of '{instantiation}': parameter '{parameter}' has no integer default")]
    UnresolvedWidth {
        instantiation: String,
        parameter: String,
    },

    #[error("width of '{instantiation}' overflows 32 bits")]
    WidthOverflow { instantiation: String },

    #[error("instantiation of '{reactor}' nested deeper than {limit} levels")]
    InstantiationTooDeep { reactor: String, limit: usize },

    #[error("program has no main reactor")]
    NoMainReactor,
}

impl CodegenError {
    pub fn code(&self) -> crate::diag::DiagCode {
        match self {
            CodegenError::InvalidReferenceKind { .. } => codes::E0101,
            CodegenError::UnresolvedVariable { .. } => codes::E0102,
            CodegenError::UnknownReactor(_) => codes::E0103,
            CodegenError::UnknownContainer { .. } => codes::E0104,
            CodegenError::UnresolvedWidth { .. } => codes::E0105,
            CodegenError::InstantiationTooDeep { .. } => codes::E0106,
            CodegenError::NoMainReactor => codes::E0107,
            CodegenError::WidthOverflow { .. } => codes::E0108,
        }
    }

    /// Convert into a diagnostic for reporting alongside generated output.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::new(DiagLevel::Error, self.to_string()).with_code(self.code());
        match self {
            CodegenError::InvalidReferenceKind { reference, .. } => diag
                .with_subject(reference.clone())
                .with_hint("only ports may be indexed or written as reaction effects"),
            CodegenError::UnresolvedWidth { instantiation, .. } => diag
                .with_subject(instantiation.clone())
                .with_hint("give the width parameter a single integer default"),
            CodegenError::WidthOverflow { instantiation } => diag
                .with_subject(instantiation.clone())
                .with_hint("bank widths must fit in 32 bits"),
            CodegenError::InstantiationTooDeep { reactor, .. } => diag
                .with_subject(reactor.clone())
                .with_hint("instantiation must not be recursive"),
            _ => diag,
        }
    }
}
