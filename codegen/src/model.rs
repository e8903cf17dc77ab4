// model.rs — Declaration model consumed by the code-generation core
//
// Reactor classes with their parameters, state, ports, actions, timers,
// reactions, and nested instantiations. The model is produced upstream
// (parsing + validation) and is immutable here; it derives serde so test
// fixtures and external front ends can hand it over as JSON.
//
// Preconditions: the model is validated (no cyclic instantiation, names
//   unique within a reactor).
// Postconditions: none (data-only module plus lookups).
// Failure modes: lookups return `None`; `VarRef::resolve` reports unknown
//   names as `CodegenError`.
// Side effects: none.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CodegenError;
use crate::id::{ReactionKey, ReactorId};
use crate::time::TimeValue;

// ── Types and values ────────────────────────────────────────────────────────

/// An explicitly declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    /// The builtin `time` type.
    Time,
    /// Target-language type text, passed through verbatim.
    Code(String),
    /// A list of `element`; `size` is absent for variable-length lists.
    List {
        element: Box<Type>,
        size: Option<usize>,
    },
}

impl Type {
    pub fn is_time(&self) -> bool {
        matches!(self, Type::Time)
    }
}

/// An initializer or argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Time(TimeValue),
    /// Reference to a parameter of the enclosing reactor.
    Parameter(String),
    /// Opaque literal text (numbers, strings, target code).
    Literal(String),
}

/// `[+-]digits[.digits][e[+-]digits]` or `[+-].digits[...]`.
static NUMERIC_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+\-]?(\d+(\.\d*)?|\.\d+)([eE][+\-]?\d+)?$")
        .expect("numeric literal pattern is valid")
});

/// Whether `text` is a plain numeric literal. `inf` and `nan` are not.
pub fn is_numeric_literal(text: &str) -> bool {
    NUMERIC_LITERAL.is_match(text.trim())
}

impl Value {
    pub fn literal(text: impl Into<String>) -> Self {
        Value::Literal(text.into())
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        Value::Parameter(name.into())
    }

    /// Numerically zero: a zero-magnitude time literal (any unit) or a numeric
    /// literal that evaluates to zero. Parameter references never are.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Time(t) => t.is_zero(),
            Value::Literal(text) => {
                is_numeric_literal(text) && text.trim().parse::<f64>().is_ok_and(|v| v == 0.0)
            }
            Value::Parameter(_) => false,
        }
    }

    /// Source text of the value with no interpretation applied.
    pub fn to_text(&self) -> String {
        match self {
            Value::Time(t) => t.to_string(),
            Value::Parameter(name) => name.clone(),
            Value::Literal(text) => text.clone(),
        }
    }
}

/// Delay requested on a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delay {
    Parameter(String),
    Time(TimeValue),
}

impl Delay {
    pub fn to_text(&self) -> String {
        match self {
            Delay::Parameter(name) => name.clone(),
            Delay::Time(t) => t.to_string(),
        }
    }
}

// ── Width specifications ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthTerm {
    Literal(u32),
    Parameter(String),
}

/// Width of a bank or multiport: the sum of its terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthSpec {
    pub terms: Vec<WidthTerm>,
}

impl WidthSpec {
    pub fn literal(width: u32) -> Self {
        Self {
            terms: vec![WidthTerm::Literal(width)],
        }
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        Self {
            terms: vec![WidthTerm::Parameter(name.into())],
        }
    }
}

// ── Declarations ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub ty: Option<Type>,
    #[serde(default)]
    pub init: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVar {
    pub name: String,
    #[serde(default)]
    pub ty: Option<Type>,
    #[serde(default)]
    pub init: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    Input,
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub direction: PortDirection,
    #[serde(default)]
    pub ty: Option<Type>,
    #[serde(default)]
    pub width: Option<WidthSpec>,
}

impl Port {
    pub fn is_multiport(&self) -> bool {
        self.width.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOrigin {
    #[default]
    Logical,
    Physical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub origin: ActionOrigin,
    #[serde(default)]
    pub ty: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub name: String,
    #[serde(default)]
    pub offset: Option<Value>,
    #[serde(default)]
    pub period: Option<Value>,
}

/// Reference to a port, action, or timer, optionally through one level of
/// containment (`container.variable`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarRef {
    #[serde(default)]
    pub container: Option<String>,
    pub variable: String,
}

impl VarRef {
    pub fn local(variable: impl Into<String>) -> Self {
        Self {
            container: None,
            variable: variable.into(),
        }
    }

    pub fn contained(container: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            container: Some(container.into()),
            variable: variable.into(),
        }
    }

    /// Resolve against the reactor in whose body the reference appears.
    pub fn resolve<'a>(
        &self,
        reactor: &'a Reactor,
        program: &'a Program,
    ) -> Result<ResolvedVarRef<'a>, CodegenError> {
        let (container, scope) = match &self.container {
            Some(name) => {
                let inst = reactor.instantiation(name).ok_or_else(|| {
                    CodegenError::UnknownContainer {
                        container: name.clone(),
                        reactor: reactor.name.clone(),
                    }
                })?;
                let class = program
                    .reactor_by_name(&inst.reactor_class)
                    .ok_or_else(|| CodegenError::UnknownReactor(inst.reactor_class.clone()))?;
                (Some(inst), class)
            }
            None => (None, reactor),
        };
        let variable =
            scope
                .variable(&self.variable)
                .ok_or_else(|| CodegenError::UnresolvedVariable {
                    variable: self.variable.clone(),
                    reactor: scope.name.clone(),
                })?;
        Ok(ResolvedVarRef {
            container,
            variable,
        })
    }
}

/// The variable a reference resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variable<'a> {
    Port(&'a Port),
    Action(&'a Action),
    Timer(&'a Timer),
}

impl<'a> Variable<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Variable::Port(p) => &p.name,
            Variable::Action(a) => &a.name,
            Variable::Timer(t) => &t.name,
        }
    }

    /// Article + kind, for messages ("a port", "an action", "a timer").
    pub fn kind(&self) -> &'static str {
        match self {
            Variable::Port(_) => "a port",
            Variable::Action(_) => "an action",
            Variable::Timer(_) => "a timer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedVarRef<'a> {
    pub container: Option<&'a Instantiation>,
    pub variable: Variable<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    #[serde(default)]
    pub triggers: Vec<VarRef>,
    #[serde(default)]
    pub sources: Vec<VarRef>,
    #[serde(default)]
    pub effects: Vec<VarRef>,
    /// Target code of the reaction body.
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instantiation {
    pub name: String,
    pub reactor_class: String,
    /// Present for banks.
    #[serde(default)]
    pub width: Option<WidthSpec>,
    #[serde(default)]
    pub parameters: Vec<(String, Vec<Value>)>,
}

impl Instantiation {
    pub fn is_bank(&self) -> bool {
        self.width.is_some()
    }
}

/// A reactor class declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reactor {
    pub name: String,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub is_federated: bool,
    #[serde(default)]
    pub preambles: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub state_vars: Vec<StateVar>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub timers: Vec<Timer>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub instantiations: Vec<Instantiation>,
}

impl Reactor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    pub fn instantiation(&self, name: &str) -> Option<&Instantiation> {
        self.instantiations.iter().find(|i| i.name == name)
    }

    /// Look up a referenceable variable: ports first, then actions, then timers.
    pub fn variable(&self, name: &str) -> Option<Variable<'_>> {
        if let Some(port) = self.port(name) {
            return Some(Variable::Port(port));
        }
        if let Some(action) = self.actions.iter().find(|a| a.name == name) {
            return Some(Variable::Action(action));
        }
        self.timers
            .iter()
            .find(|t| t.name == name)
            .map(Variable::Timer)
    }

    // ── Reaction naming ──

    /// Name a reaction is represented with in target code (`r0`, `r1`, ...).
    pub fn reaction_name(index: usize) -> String {
        format!("r{}", index)
    }

    /// Explicit label if present, else the reaction name.
    pub fn reaction_label(&self, index: usize) -> String {
        self.reactions
            .get(index)
            .and_then(|r| r.label.clone())
            .unwrap_or_else(|| Self::reaction_name(index))
    }

    /// Reactions run in declaration order; priorities start at 1.
    pub fn reaction_priority(index: usize) -> usize {
        index + 1
    }
}

// ── Program ─────────────────────────────────────────────────────────────────

/// All reactor classes of a compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub reactors: Vec<Reactor>,
}

impl Program {
    pub fn new(reactors: Vec<Reactor>) -> Self {
        Self { reactors }
    }

    /// Load a validated program model handed over as JSON.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn reactor(&self, id: ReactorId) -> &Reactor {
        &self.reactors[id.index()]
    }

    pub fn reactor_id(&self, name: &str) -> Option<ReactorId> {
        self.reactors
            .iter()
            .position(|r| r.name == name)
            .map(|i| ReactorId(i as u32))
    }

    pub fn reactor_by_name(&self, name: &str) -> Option<&Reactor> {
        self.reactors.iter().find(|r| r.name == name)
    }

    pub fn main_reactor(&self) -> Option<ReactorId> {
        self.reactors
            .iter()
            .position(|r| r.is_main)
            .map(|i| ReactorId(i as u32))
    }

    /// Keys of all reactions declared by `reactor`, in declaration order.
    pub fn reaction_keys(&self, reactor: ReactorId) -> impl Iterator<Item = ReactionKey> + '_ {
        (0..self.reactor(reactor).reactions.len()).map(move |i| ReactionKey::new(reactor, i))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
