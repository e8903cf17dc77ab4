// infer.rs — Type inference for declarations without an explicit type
//
// Only two types are ever inferred: `time` (a single non-zero time value)
// and `time list` (several time values, at least one non-zero). Everything
// else is `Undefined`, which is a legitimate result and not an error:
// dynamically typed targets ignore it, statically typed targets render
// their undefined type.
//
// A lone zero stays `Undefined` (it may just as well be a count), while a
// zero inside a list is accepted once another element proves the list holds
// times. The asymmetry is deliberate and covered by tests.
//
// Preconditions: parameter references name parameters of the scope.
// Postconditions: returns exactly one `InferredType`; never fails.
// Failure modes: none (unresolvable references degrade to `Undefined`).
// Side effects: emits a `tracing` warning on precondition violations.

use crate::model::{is_numeric_literal, Action, Parameter, Port, Reactor, StateVar, Type, Value};

/// Bound on parameter-to-parameter indirection. Cycles are cut separately,
/// as soon as a parameter is revisited.
const MAX_PARAMETER_INDIRECTION: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferredType {
    Explicit(Type),
    Time,
    /// Variable-length list of times; no element count is recorded.
    TimeList,
    Undefined,
}

impl InferredType {
    /// `time`, or an explicit `time` annotation.
    pub fn is_time(&self) -> bool {
        matches!(self, InferredType::Time | InferredType::Explicit(Type::Time))
    }

    /// Any type whose values are times or lists of times.
    pub fn is_time_like(&self) -> bool {
        match self {
            InferredType::Time | InferredType::TimeList => true,
            InferredType::Explicit(Type::Time) => true,
            InferredType::Explicit(Type::List { element, .. }) => element.is_time(),
            _ => false,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, InferredType::Undefined)
    }
}

/// Where parameter references in initializers are looked up.
pub trait ParameterScope {
    fn lookup_parameter(&self, name: &str) -> Option<&Parameter>;
}

impl ParameterScope for Reactor {
    fn lookup_parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameter(name)
    }
}

impl ParameterScope for [Parameter] {
    fn lookup_parameter(&self, name: &str) -> Option<&Parameter> {
        self.iter().find(|p| p.name == name)
    }
}

/// Infer the type of a declaration from its explicit type and initializers.
pub fn infer(
    explicit: Option<&Type>,
    init: &[Value],
    scope: &(impl ParameterScope + ?Sized),
) -> InferredType {
    infer_in_chain(explicit, init, scope, &mut Vec::new())
}

pub fn infer_parameter(param: &Parameter, scope: &(impl ParameterScope + ?Sized)) -> InferredType {
    infer(param.ty.as_ref(), &param.init, scope)
}

pub fn infer_state_var(state: &StateVar, scope: &(impl ParameterScope + ?Sized)) -> InferredType {
    infer(state.ty.as_ref(), &state.init, scope)
}

/// Ports carry no initializer, so only the explicit type matters.
pub fn infer_port(port: &Port) -> InferredType {
    explicit_only(port.ty.as_ref())
}

pub fn infer_action(action: &Action) -> InferredType {
    explicit_only(action.ty.as_ref())
}

fn explicit_only(ty: Option<&Type>) -> InferredType {
    match ty {
        Some(t) => InferredType::Explicit(t.clone()),
        None => InferredType::Undefined,
    }
}

/// `chain` holds the parameters currently being resolved, outermost first.
fn infer_in_chain(
    explicit: Option<&Type>,
    init: &[Value],
    scope: &(impl ParameterScope + ?Sized),
    chain: &mut Vec<String>,
) -> InferredType {
    if let Some(ty) = explicit {
        return InferredType::Explicit(ty.clone());
    }
    match init {
        [] => InferredType::Undefined,
        [Value::Parameter(name)] => infer_parameter_ref(name, scope, chain),
        [single] => {
            if is_valid_time(single, scope, chain) && !single.is_zero() {
                InferredType::Time
            } else {
                InferredType::Undefined
            }
        }
        many => {
            let all_valid = many.iter().all(|v| is_valid_time(v, scope, chain));
            let any_nonzero = many.iter().any(|v| !v.is_zero());
            if all_valid && any_nonzero {
                InferredType::TimeList
            } else {
                InferredType::Undefined
            }
        }
    }
}

fn infer_parameter_ref(
    name: &str,
    scope: &(impl ParameterScope + ?Sized),
    chain: &mut Vec<String>,
) -> InferredType {
    if chain.iter().any(|n| n == name) || chain.len() >= MAX_PARAMETER_INDIRECTION {
        tracing::warn!(parameter = name, "cyclic or too deep parameter reference; leaving type undefined");
        return InferredType::Undefined;
    }
    let Some(param) = scope.lookup_parameter(name) else {
        tracing::warn!(parameter = name, "unresolved parameter reference in initializer");
        return InferredType::Undefined;
    };
    chain.push(name.to_string());
    let ty = infer_in_chain(param.ty.as_ref(), &param.init, scope, chain);
    chain.pop();
    ty
}

/// A time literal with a unit (or unitless zero), a bare numeric literal, or
/// a reference to a parameter of time type.
fn is_valid_time(
    value: &Value,
    scope: &(impl ParameterScope + ?Sized),
    chain: &mut Vec<String>,
) -> bool {
    match value {
        Value::Time(t) => t.is_valid_time(),
        Value::Literal(text) => is_numeric_literal(text),
        Value::Parameter(name) => infer_parameter_ref(name, scope, chain).is_time(),
    }
}

/// Whether `value` is a valid time expression in `scope`.
pub fn is_valid_time_expr(value: &Value, scope: &(impl ParameterScope + ?Sized)) -> bool {
    is_valid_time(value, scope, &mut Vec::new())
}

// ── Tests ───────────────────────────────────────────────────────────────────
