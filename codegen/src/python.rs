// python.rs — Python class bodies for reactor classes
//
// Renders the blocks requested by the expander in Python syntax: a class
// `_<Name>`, preamble code, an `__init__` that defines parameters (with
// keyword overrides) and state variables, one read-only property per
// parameter, and one `reaction_function_<i>` per generated reaction.
//
// Preconditions: reaction references resolve within their reactor.
// Postconditions: output is valid Python given valid preamble/body code.
// Failure modes: unresolved references and timers written as effects
//   produce `CodegenError`.
// Side effects: none.

use crate::emit::{dedent, CodeBuilder};
use crate::error::CodegenError;
use crate::expand::{ClassContext, ClassEmitter};
use crate::infer::{infer_parameter, infer_state_var};
use crate::lower::{lower_port_ref, lower_var_ref};
use crate::model::{Reaction, ResolvedVarRef, VarRef, Variable};
use crate::target::{PythonTypes, TargetTypes};

#[derive(Debug, Clone, Copy, Default)]
pub struct PythonEmitter {
    types: PythonTypes,
}

impl PythonEmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClassEmitter for PythonEmitter {
    fn class_header(&self, ctx: &ClassContext<'_>, code: &mut CodeBuilder) {
        if ctx.options.class_comments {
            code.line(&format!("# Python class for reactor {}", ctx.reactor.name));
        }
        code.line(&format!("class _{}:", ctx.reactor.name));
    }

    fn preamble(&self, ctx: &ClassContext<'_>, code: &mut CodeBuilder) {
        for preamble in &ctx.reactor.preambles {
            let text = dedent(preamble);
            if !text.is_empty() {
                code.line(&text);
            }
        }
    }

    fn constructor(
        &self,
        ctx: &ClassContext<'_>,
        code: &mut CodeBuilder,
    ) -> Result<(), CodegenError> {
        let reactor = ctx.reactor;
        code.line("def __init__(self, **kwargs):");
        code.indent();
        if !reactor.parameters.is_empty() {
            code.line("# Define parameters and their default values");
            for param in &reactor.parameters {
                let ty = infer_parameter(param, reactor);
                let init = self.types.target_initializer(&param.init, &ty);
                code.line(&format!("self._{} = {}", param.name, init));
            }
        }
        code.line("# Handle parameters that are set in instantiation");
        code.line("self.__dict__.update(kwargs)");
        if !reactor.state_vars.is_empty() {
            code.line("# Define state variables");
            for state in &reactor.state_vars {
                let ty = infer_state_var(state, reactor);
                let init = self.types.target_initializer(&state.init, &ty);
                code.line(&format!("self.{} = {}", state.name, init));
            }
        }
        code.unindent();
        Ok(())
    }

    fn getters(&self, ctx: &ClassContext<'_>, code: &mut CodeBuilder) {
        for param in &ctx.reactor.parameters {
            code.blank();
            code.line("@property");
            code.line(&format!("def {}(self):", param.name));
            code.indent();
            code.line(&format!("return self._{}", param.name));
            code.unindent();
        }
    }

    fn reactions(
        &self,
        ctx: &ClassContext<'_>,
        reactions: &[usize],
        code: &mut CodeBuilder,
    ) -> Result<(), CodegenError> {
        for &index in reactions {
            let reaction = &ctx.reactor.reactions[index];
            code.blank();
            self.reaction(ctx, index, reaction, code)?;
        }
        Ok(())
    }
}

impl PythonEmitter {
    fn reaction(
        &self,
        ctx: &ClassContext<'_>,
        index: usize,
        reaction: &Reaction,
        code: &mut CodeBuilder,
    ) -> Result<(), CodegenError> {
        let resolve = |refs: &[VarRef]| {
            refs.iter()
                .map(|r| r.resolve(ctx.reactor, ctx.program))
                .collect::<Result<Vec<_>, _>>()
        };
        let triggers = resolve(&reaction.triggers)?;
        let sources = resolve(&reaction.sources)?;
        let effects = resolve(&reaction.effects)?;

        let mut args: Vec<&str> = Vec::new();
        for r in triggers.iter().chain(&sources).chain(&effects) {
            if let Some(arg) = argument_name(r) {
                if !args.contains(&arg) {
                    args.push(arg);
                }
            }
        }
        let effect_texts = effects
            .iter()
            .map(effect_text)
            .collect::<Result<Vec<_>, _>>()?;

        let params: String = args.iter().map(|a| format!(", {}", a)).collect();
        code.line(&format!("def reaction_function_{}(self{}):", index, params));
        code.indent();
        if let Some(label) = &reaction.label {
            code.line(&format!("# {}", label));
        }
        if !effect_texts.is_empty() {
            code.line(&format!("# effects: {}", effect_texts.join(", ")));
        }
        let body = dedent(&reaction.code);
        if !body.is_empty() {
            code.line(&body);
        }
        code.line("return 0");
        code.unindent();
        Ok(())
    }
}

/// Contained references pass their container; timers are not passed.
fn argument_name<'a>(reference: &ResolvedVarRef<'a>) -> Option<&'a str> {
    match (reference.container, reference.variable) {
        (Some(container), _) => Some(&container.name),
        (None, Variable::Timer(_)) => None,
        (None, variable) => Some(variable.name()),
    }
}

/// Effects are actions or ports; anything else is rejected as a non-port.
fn effect_text(reference: &ResolvedVarRef<'_>) -> Result<String, CodegenError> {
    match reference.variable {
        Variable::Action(_) => Ok(lower_var_ref(reference)),
        _ => lower_port_ref(reference, None, None),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
