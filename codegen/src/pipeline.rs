// pipeline.rs — Per-federate class generation
//
// Runs one top-level expansion per federate, each with its own
// de-duplication set, and collects the class text together with a
// fingerprint of it. Failures are converted into diagnostics so that one
// broken federate does not hide the others.
//
// Preconditions: `tree` was elaborated from `program`.
// Postconditions: `federates` holds one entry per successfully expanded
//   federate, in input order; `has_error` is set iff a federate failed.
// Failure modes: emitter failures, reported as error diagnostics.
// Side effects: logs one debug event per federate.

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use crate::diag::Diagnostic;
use crate::emit::CodegenOptions;
use crate::expand::{expand_classes, ClassEmitter, Expansion};
use crate::federate::{Federate, FederateInstance};
use crate::instance::InstanceTree;
use crate::model::Program;

/// Generated classes for one federate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederateClasses {
    pub federate: String,
    pub source: String,
    /// Emitted classes in emission order.
    pub class_names: Vec<String>,
    /// Hex SHA-256 of `source` (64 characters).
    pub fingerprint: String,
}

#[derive(Debug, Default)]
pub struct GenerationResult {
    pub federates: Vec<FederateClasses>,
    pub diagnostics: Vec<Diagnostic>,
    pub has_error: bool,
}

impl GenerationResult {
    pub fn federate(&self, name: &str) -> Option<&FederateClasses> {
        self.federates.iter().find(|f| f.federate == name)
    }
}

/// Generate class bodies for every federate.
pub fn generate<F: Federate>(
    program: &Program,
    tree: &InstanceTree,
    federates: &[F],
    emitter: &dyn ClassEmitter,
    options: &CodegenOptions,
) -> GenerationResult {
    let mut result = GenerationResult::default();
    for federate in federates {
        let ctx = Expansion::new(program, tree, federate, emitter, options);
        match expand_classes(&ctx) {
            Ok(expanded) => {
                let fingerprint = fingerprint(&expanded.source);
                tracing::debug!(
                    federate = federate.name(),
                    classes = expanded.class_names.len(),
                    %fingerprint,
                    "generated federate classes"
                );
                result.federates.push(FederateClasses {
                    federate: federate.name().to_string(),
                    source: expanded.source,
                    class_names: expanded.class_names,
                    fingerprint,
                });
            }
            Err(err) => {
                tracing::debug!(federate = federate.name(), error = %err, "generation failed");
                result.has_error = true;
                result
                    .diagnostics
                    .push(err.to_diagnostic().with_subject(federate.name()));
            }
        }
    }
    result
}

/// Generate for an unfederated program: one federate owning everything.
pub fn generate_unfederated(
    program: &Program,
    tree: &InstanceTree,
    emitter: &dyn ClassEmitter,
    options: &CodegenOptions,
) -> GenerationResult {
    generate(
        program,
        tree,
        &[FederateInstance::unfederated()],
        emitter,
        options,
    )
}

/// Hex SHA-256 of generated text.
pub fn fingerprint(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for b in digest.iter() {
        let _ = write!(hex, "{:02x}", b);
    }
    hex
}

// ── Tests ───────────────────────────────────────────────────────────────────
