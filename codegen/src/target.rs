// target.rs — Per-target rendering of types, time expressions, and initializers
//
// `TargetTypes` is the one boundary through which backends turn inferred
// types and initializer values into target text. The provided methods encode
// the shared semantics (zero handling, parameter references, leading-dot
// floats); implementations only supply the target's vocabulary.
//
// Preconditions: inferred types come from `infer`.
// Postconditions: rendering is deterministic.
// Failure modes: none.
// Side effects: none.

use crate::infer::InferredType;
use crate::lower::{lower_time, normalize_leading_dot_float};
use crate::model::{Type, Value};
use crate::time::{TimeUnit, TimeValue};

pub trait TargetTypes {
    fn supports_generics(&self) -> bool;

    fn time_type(&self) -> &'static str;

    fn tag_type(&self) -> &'static str;

    fn undefined_type(&self) -> &'static str;

    fn fixed_size_list_type(&self, base: &str, size: usize) -> String;

    fn variable_size_list_type(&self, base: &str) -> String;

    /// Render a time literal. Defaults to the canonical unit-call token.
    fn time_expr(&self, value: TimeValue) -> String {
        lower_time(Some(value))
    }

    /// Render a reference to a parameter of the enclosing reactor.
    fn param_ref(&self, name: &str) -> String {
        name.to_string()
    }

    /// Target type for an inferred type.
    fn target_type(&self, ty: &InferredType) -> String {
        match ty {
            InferredType::Explicit(t) => self.explicit_type(t),
            InferredType::Time => self.time_type().to_string(),
            InferredType::TimeList => self.variable_size_list_type(self.time_type()),
            InferredType::Undefined => self.undefined_type().to_string(),
        }
    }

    fn explicit_type(&self, ty: &Type) -> String {
        match ty {
            Type::Time => self.time_type().to_string(),
            Type::Code(text) => text.clone(),
            Type::List { element, size } => {
                let base = self.explicit_type(element);
                match size {
                    Some(n) => self.fixed_size_list_type(&base, *n),
                    None => self.variable_size_list_type(&base),
                }
            }
        }
    }

    /// Render one initializer value. A literal zero given to a time-typed
    /// declaration becomes the target's zero time.
    fn target_expr(&self, value: &Value, ty: &InferredType) -> String {
        match value {
            Value::Time(t) => self.time_expr(*t),
            Value::Parameter(name) => self.param_ref(name),
            Value::Literal(_) if ty.is_time_like() && value.is_zero() => {
                self.time_expr(TimeValue::new(0, TimeUnit::None))
            }
            Value::Literal(text) => normalize_leading_dot_float(text),
        }
    }

    /// Expression used when a declaration has no initializer.
    fn missing_expr(&self, ty: &InferredType) -> String;

    /// Render a whole initializer list.
    fn target_initializer(&self, init: &[Value], ty: &InferredType) -> String;

    /// Initializer in direct-initialization position (`member(init)` in a
    /// constructor's member initializer list). A single assigned value is
    /// wrapped in parentheses; lists keep their delimiters and render their
    /// items with the element type.
    fn cpp_initializer_list(&self, init: &[Value], form: InitForm, ty: &InferredType) -> String {
        if init.is_empty() {
            return self.missing_expr(ty);
        }
        let element = element_type(ty);
        let items = |values: &[Value]| {
            values
                .iter()
                .map(|v| self.target_expr(v, &element))
                .collect::<Vec<_>>()
                .join(", ")
        };
        match (form, init) {
            (InitForm::Assign, [single]) => format!("({})", self.target_expr(single, ty)),
            (InitForm::Assign | InitForm::Braces, values) => format!("{{{}}}", items(values)),
            (InitForm::Parens, values) => format!("({})", items(values)),
        }
    }
}

/// How an initializer was written: `p = v` (or `p = {a, b}`), `p{a, b}`, or
/// `p(a, b)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InitForm {
    #[default]
    Assign,
    Braces,
    Parens,
}

// ── Dynamically typed target ────────────────────────────────────────────────

/// Python: types are not written out; times use the runtime's unit functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonTypes;

impl TargetTypes for PythonTypes {
    fn supports_generics(&self) -> bool {
        false
    }

    fn time_type(&self) -> &'static str {
        ""
    }

    fn tag_type(&self) -> &'static str {
        ""
    }

    fn undefined_type(&self) -> &'static str {
        ""
    }

    fn fixed_size_list_type(&self, _base: &str, _size: usize) -> String {
        String::new()
    }

    fn variable_size_list_type(&self, _base: &str) -> String {
        String::new()
    }

    fn param_ref(&self, name: &str) -> String {
        format!("self._{}", name)
    }

    fn missing_expr(&self, _ty: &InferredType) -> String {
        "None".to_string()
    }

    fn target_initializer(&self, init: &[Value], ty: &InferredType) -> String {
        match init {
            [] => self.missing_expr(ty),
            [single] => self.target_expr(single, ty),
            many => {
                let items: Vec<String> = many.iter().map(|v| self.target_expr(v, ty)).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }
}

// ── Statically typed target ─────────────────────────────────────────────────

/// C++: `reactor::Duration` times with chrono-style literal suffixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppTypes;

/// Literal suffix for a unit; weeks are spelled as days.
fn cpp_unit_suffix(unit: TimeUnit) -> &'static str {
    match unit {
        TimeUnit::None => "",
        TimeUnit::Nsec => "ns",
        TimeUnit::Usec => "us",
        TimeUnit::Msec => "ms",
        TimeUnit::Sec => "s",
        TimeUnit::Min => "min",
        TimeUnit::Hour => "h",
        TimeUnit::Day => "d",
        TimeUnit::Week => "d*7",
    }
}

impl TargetTypes for CppTypes {
    fn supports_generics(&self) -> bool {
        true
    }

    fn time_type(&self) -> &'static str {
        "reactor::Duration"
    }

    fn tag_type(&self) -> &'static str {
        "reactor::Tag"
    }

    fn undefined_type(&self) -> &'static str {
        "void"
    }

    fn fixed_size_list_type(&self, base: &str, size: usize) -> String {
        format!("std::array<{}, {}>", base, size)
    }

    fn variable_size_list_type(&self, base: &str) -> String {
        format!("std::vector<{}>", base)
    }

    fn time_expr(&self, value: TimeValue) -> String {
        if value.is_zero() {
            "reactor::Duration::zero()".to_string()
        } else {
            format!("{}{}", value.magnitude, cpp_unit_suffix(value.unit))
        }
    }

    fn missing_expr(&self, ty: &InferredType) -> String {
        if ty.is_time() {
            self.time_expr(TimeValue::ZERO)
        } else {
            "{}".to_string()
        }
    }

    fn target_initializer(&self, init: &[Value], ty: &InferredType) -> String {
        cpp_standalone_initializer(self, init, ty)
    }
}

/// C++ in the context of the outer reactor class: parameter references go
/// through the `__lf_inner` instance. Everything else is `CppTypes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppOuterTypes;

impl TargetTypes for CppOuterTypes {
    fn supports_generics(&self) -> bool {
        CppTypes.supports_generics()
    }

    fn time_type(&self) -> &'static str {
        CppTypes.time_type()
    }

    fn tag_type(&self) -> &'static str {
        CppTypes.tag_type()
    }

    fn undefined_type(&self) -> &'static str {
        CppTypes.undefined_type()
    }

    fn fixed_size_list_type(&self, base: &str, size: usize) -> String {
        CppTypes.fixed_size_list_type(base, size)
    }

    fn variable_size_list_type(&self, base: &str) -> String {
        CppTypes.variable_size_list_type(base)
    }

    fn time_expr(&self, value: TimeValue) -> String {
        CppTypes.time_expr(value)
    }

    fn param_ref(&self, name: &str) -> String {
        format!("__lf_inner.{}", name)
    }

    fn missing_expr(&self, ty: &InferredType) -> String {
        CppTypes.missing_expr(ty)
    }

    fn target_initializer(&self, init: &[Value], ty: &InferredType) -> String {
        cpp_standalone_initializer(self, init, ty)
    }
}

/// Standalone C++ initializer: a single value as is, several values as a
/// constructor call `<type>{a, b}` with element-typed items.
fn cpp_standalone_initializer(
    types: &impl TargetTypes,
    init: &[Value],
    ty: &InferredType,
) -> String {
    match init {
        [] => types.missing_expr(ty),
        [single] => types.target_expr(single, ty),
        many => {
            let element = element_type(ty);
            let items: Vec<String> = many
                .iter()
                .map(|v| types.target_expr(v, &element))
                .collect();
            format!("{}{{{}}}", types.target_type(ty), items.join(", "))
        }
    }
}

/// Element type of a list type; other types are their own element type.
fn element_type(ty: &InferredType) -> InferredType {
    match ty {
        InferredType::TimeList => InferredType::Time,
        InferredType::Explicit(Type::List { element, .. }) => {
            InferredType::Explicit((**element).clone())
        }
        other => other.clone(),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
