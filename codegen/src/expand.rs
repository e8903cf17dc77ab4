// expand.rs — Instance-tree expansion with deduplicated class synthesis
//
// Walks the instance tree depth-first, pre-order. Each distinct reactor
// class owned by the federate is synthesized once, at the first instance
// that reaches it; every instance is still visited so owned classes nested
// under non-owned or already-emitted instances are found.
//
// Preconditions: `tree` was elaborated from `program`; the federate was
//   assigned over the same tree.
// Postconditions: the output contains each owned, non-delay class reachable
//   from the start instance exactly once, in first-reached order.
// Failure modes: emitter failures (e.g. a timer written as an effect) abort
//   the walk and are returned unchanged.
// Side effects: inserts into the caller's `EmittedClasses`.

use std::collections::HashSet;

use crate::emit::{CodeBuilder, CodegenOptions};
use crate::error::CodegenError;
use crate::federate::Federate;
use crate::id::{InstanceId, ReactionKey, ReactorId};
use crate::instance::InstanceTree;
use crate::model::{Program, Reactor};

// ── Emitter seam ────────────────────────────────────────────────────────────

/// Everything an emitter may consult while rendering one class.
pub struct ClassContext<'a> {
    pub program: &'a Program,
    pub reactor_id: ReactorId,
    pub reactor: &'a Reactor,
    pub options: &'a CodegenOptions,
}

/// Target syntax for a reactor class. The expander decides which classes and
/// reactions are emitted; the emitter decides how they look.
///
/// `class_header` is written at the outer level; the other blocks are
/// written one level deeper.
pub trait ClassEmitter {
    fn class_header(&self, ctx: &ClassContext<'_>, code: &mut CodeBuilder);

    fn preamble(&self, ctx: &ClassContext<'_>, code: &mut CodeBuilder);

    /// Constructor-equivalent block from parameters and state variables.
    fn constructor(&self, ctx: &ClassContext<'_>, code: &mut CodeBuilder)
        -> Result<(), CodegenError>;

    fn getters(&self, ctx: &ClassContext<'_>, code: &mut CodeBuilder);

    /// `reactions` are indices into `ctx.reactor.reactions`, already filtered.
    fn reactions(
        &self,
        ctx: &ClassContext<'_>,
        reactions: &[usize],
        code: &mut CodeBuilder,
    ) -> Result<(), CodegenError>;
}

// ── De-duplication state ────────────────────────────────────────────────────

/// Class names emitted so far in one top-level expansion, in emission order.
#[derive(Debug, Clone, Default)]
pub struct EmittedClasses {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl EmittedClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.seen.contains(class_name)
    }

    /// Record a class; returns `false` if it was already present.
    pub fn insert(&mut self, class_name: &str) -> bool {
        if !self.seen.insert(class_name.to_string()) {
            return false;
        }
        self.order.push(class_name.to_string());
        true
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_names(self) -> Vec<String> {
        self.order
    }
}

// ── Expansion ───────────────────────────────────────────────────────────────

/// Inputs shared by every step of one expansion.
pub struct Expansion<'a> {
    pub program: &'a Program,
    pub tree: &'a InstanceTree,
    pub federate: &'a dyn Federate,
    pub emitter: &'a dyn ClassEmitter,
    pub options: &'a CodegenOptions,
    /// The main instance; always eligible for emission.
    pub root: InstanceId,
}

impl<'a> Expansion<'a> {
    pub fn new(
        program: &'a Program,
        tree: &'a InstanceTree,
        federate: &'a dyn Federate,
        emitter: &'a dyn ClassEmitter,
        options: &'a CodegenOptions,
    ) -> Self {
        Self {
            program,
            tree,
            federate,
            emitter,
            options,
            root: tree.root(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedClasses {
    pub source: String,
    pub class_names: Vec<String>,
}

/// Expand from the root with a fresh de-duplication set.
pub fn expand_classes(ctx: &Expansion<'_>) -> Result<ExpandedClasses, CodegenError> {
    let mut emitted = EmittedClasses::new();
    let source = expand_instance(ctx, ctx.root, &mut emitted)?;
    Ok(ExpandedClasses {
        source,
        class_names: emitted.into_names(),
    })
}

/// Expand `instance` and its descendants, sharing `emitted` with the caller.
pub fn expand_instance(
    ctx: &Expansion<'_>,
    instance: InstanceId,
    emitted: &mut EmittedClasses,
) -> Result<String, CodegenError> {
    let inst = ctx.tree.get(instance);
    let reactor = ctx.program.reactor(inst.reactor);
    let mut out = String::new();

    let owned = instance == ctx.root || ctx.federate.contains_instance(ctx.tree, instance);
    if !owned || ctx.options.is_delay_class(&reactor.name) {
        tracing::trace!(
            instance = %ctx.tree.full_name(instance),
            class = %reactor.name,
            owned,
            "skipping class body"
        );
    } else if !emitted.contains(&reactor.name) {
        out.push_str(&emit_class(ctx, inst.reactor)?);
        emitted.insert(&reactor.name);
        tracing::debug!(
            class = %reactor.name,
            federate = ctx.federate.name(),
            "emitted class"
        );
    }

    for &child in &inst.children {
        out.push_str(&expand_instance(ctx, child, emitted)?);
    }
    Ok(out)
}

fn emit_class(ctx: &Expansion<'_>, reactor_id: ReactorId) -> Result<String, CodegenError> {
    let class = ClassContext {
        program: ctx.program,
        reactor_id,
        reactor: ctx.program.reactor(reactor_id),
        options: ctx.options,
    };
    let reactions = reactions_to_generate(ctx, reactor_id);

    let mut code = CodeBuilder::new(ctx.options.indent_width);
    ctx.emitter.class_header(&class, &mut code);
    code.indent();
    ctx.emitter.preamble(&class, &mut code);
    ctx.emitter.constructor(&class, &mut code)?;
    ctx.emitter.getters(&class, &mut code);
    ctx.emitter.reactions(&class, &reactions, &mut code)?;
    code.unindent();
    code.blank();
    Ok(code.finish())
}

/// Reactions of a federated reactor are limited to those the federate owns,
/// minus its network reactions. Other reactors keep all reactions.
fn reactions_to_generate(ctx: &Expansion<'_>, reactor_id: ReactorId) -> Vec<usize> {
    let reactor = ctx.program.reactor(reactor_id);
    (0..reactor.reactions.len())
        .filter(|&index| {
            if !reactor.is_federated {
                return true;
            }
            let key = ReactionKey::new(reactor_id, index);
            ctx.federate.contains_reaction(key) && !ctx.federate.is_network_reaction(key)
        })
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────────────
