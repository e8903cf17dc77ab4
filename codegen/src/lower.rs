// lower.rs — Canonical text for references, times, and values
//
// Every target backend renders references and time literals through these
// functions, so the hierarchy/bank/multiport encoding and the time token
// format are identical across targets. Target-specific rendering on top of
// the canonical forms lives behind `target::TargetTypes`.
//
// Preconditions: references are resolved against their declaring reactor.
// Postconditions: outputs are deterministic functions of their inputs.
// Failure modes: `lower_port_ref` on a non-port returns
//   `CodegenError::InvalidReferenceKind`.
// Side effects: none.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CodegenError;
use crate::model::{Delay, ResolvedVarRef, Value, Variable};
use crate::time::{TimeUnit, TimeValue};

// ── Times and values ────────────────────────────────────────────────────────

/// Render a time as a unit-named call token (`MSEC(100)`), a bare magnitude
/// for unitless values, or `0` when there is no time at all.
pub fn lower_time(time: Option<TimeValue>) -> String {
    match time {
        None => "0".to_string(),
        Some(t) if t.unit == TimeUnit::None => t.magnitude.to_string(),
        Some(t) => format!(
            "{}({})",
            t.unit.canonical_name().to_uppercase(),
            t.magnitude
        ),
    }
}

/// A parameterized delay keeps the parameter's name so the generated code
/// follows the parameter, not its default.
pub fn lower_delay(delay: &Delay) -> String {
    match delay {
        Delay::Parameter(_) => delay.to_text(),
        Delay::Time(t) => lower_time(Some(*t)),
    }
}

/// Canonical text for a value: times through `lower_time`, any numeric zero
/// as the unitless zero, everything else as written.
pub fn lower_value(value: &Value) -> String {
    match value {
        Value::Time(t) => lower_time(Some(*t)),
        v if v.is_zero() => lower_time(Some(TimeValue::ZERO)),
        v => v.to_text(),
    }
}

/// Like `lower_value`, but a zero literal is kept as written.
pub fn lower_target_value(value: &Value) -> String {
    match value {
        Value::Time(t) => lower_time(Some(*t)),
        v => v.to_text(),
    }
}

/// Optional sign, a dot, digits, then any run of digits/exponent/sign chars.
static ABBREVIATED_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+\-]?\.\d+[\deE+\-]*$").expect("abbreviated float pattern is valid")
});

/// Prefix a leading-dot float (`.5`, `-.25e3`) with a zero. Several target
/// parsers reject a bare leading dot. Other text is returned unchanged.
pub fn normalize_leading_dot_float(text: &str) -> String {
    if ABBREVIATED_FLOAT.is_match(text) {
        text.replacen('.', "0.", 1)
    } else {
        text.to_string()
    }
}

// ── References ──────────────────────────────────────────────────────────────

/// `container.variable` or `variable`; no indexing.
pub fn lower_var_ref(reference: &ResolvedVarRef<'_>) -> String {
    match reference.container {
        Some(container) => format!("{}.{}", container.name, reference.variable.name()),
        None => reference.variable.name().to_string(),
    }
}

/// Reference to a port, with `[bank]` on a banked container and
/// `[multiport]` on a multiport. Each subscript is added only when the
/// declaration has a width and the index is present and non-negative.
pub fn lower_port_ref(
    reference: &ResolvedVarRef<'_>,
    bank_index: Option<i64>,
    multiport_index: Option<i64>,
) -> Result<String, CodegenError> {
    let port = match reference.variable {
        Variable::Port(port) => port,
        other => {
            return Err(CodegenError::InvalidReferenceKind {
                reference: lower_var_ref(reference),
                found: other.kind(),
            })
        }
    };

    let mut out = String::new();
    if let Some(container) = reference.container {
        out.push_str(&container.name);
        if let Some(bank) = index_if(container.is_bank(), bank_index) {
            out.push_str(&format!("[{}]", bank));
        }
        out.push('.');
    }
    out.push_str(&port.name);
    if let Some(channel) = index_if(port.is_multiport(), multiport_index) {
        out.push_str(&format!("[{}]", channel));
    }
    Ok(out)
}

fn index_if(has_width: bool, index: Option<i64>) -> Option<i64> {
    index.filter(|&i| has_width && i >= 0)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, Instantiation, Port, PortDirection, Timer, WidthSpec};

    fn port(name: &str, width: Option<WidthSpec>) -> Port {
        Port {
            name: name.to_string(),
            direction: PortDirection::Output,
            ty: None,
            width,
        }
    }

    fn inst(name: &str, width: Option<WidthSpec>) -> Instantiation {
        Instantiation {
            name: name.to_string(),
            reactor_class: "C".to_string(),
            width,
            parameters: Vec::new(),
        }
    }

    #[test]
    fn time_with_unit_is_call_token() {
        assert_eq!(
            lower_time(Some(TimeValue::new(100, TimeUnit::Msec))),
            "MSEC(100)"
        );
        assert_eq!(lower_time(Some(TimeValue::new(2, TimeUnit::Week))), "WEEK(2)");
    }

    #[test]
    fn unitless_time_is_bare_magnitude() {
        assert_eq!(lower_time(Some(TimeValue::new(5, TimeUnit::None))), "5");
        assert_eq!(lower_time(Some(TimeValue::new(-3, TimeUnit::None))), "-3");
    }

    #[test]
    fn absent_time_is_zero() {
        assert_eq!(lower_time(None), "0");
    }

    #[test]
    fn delays() {
        assert_eq!(lower_delay(&Delay::Parameter("latency".to_string())), "latency");
        assert_eq!(
            lower_delay(&Delay::Time(TimeValue::new(10, TimeUnit::Usec))),
            "USEC(10)"
        );
    }

    #[test]
    fn values() {
        assert_eq!(
            lower_value(&Value::Time(TimeValue::new(1, TimeUnit::Sec))),
            "SEC(1)"
        );
        assert_eq!(lower_value(&Value::literal("0.0")), "0");
        assert_eq!(lower_value(&Value::literal("\"text\"")), "\"text\"");
        assert_eq!(lower_value(&Value::parameter("p")), "p");
        assert_eq!(lower_target_value(&Value::literal("0.0")), "0.0");
    }

    #[test]
    fn leading_dot_floats() {
        assert_eq!(normalize_leading_dot_float(".5"), "0.5");
        assert_eq!(normalize_leading_dot_float("-.25e3"), "-0.25e3");
        assert_eq!(normalize_leading_dot_float("+.1E-2"), "+0.1E-2");
        assert_eq!(normalize_leading_dot_float("1.5"), "1.5");
        assert_eq!(normalize_leading_dot_float("."), ".");
        assert_eq!(normalize_leading_dot_float(".x"), ".x");
        assert_eq!(normalize_leading_dot_float("a.5"), "a.5");
    }

    #[test]
    fn var_refs() {
        let out = port("out", None);
        let c = inst("c", None);
        let local = ResolvedVarRef {
            container: None,
            variable: Variable::Port(&out),
        };
        let contained = ResolvedVarRef {
            container: Some(&c),
            variable: Variable::Port(&out),
        };
        assert_eq!(lower_var_ref(&local), "out");
        assert_eq!(lower_var_ref(&contained), "c.out");
    }

    #[test]
    fn port_ref_bank_subscript_only_on_banks() {
        let out = port("out", None);
        let bank = inst("c", Some(WidthSpec::literal(4)));
        let plain = inst("c", None);
        let banked = ResolvedVarRef {
            container: Some(&bank),
            variable: Variable::Port(&out),
        };
        let unbanked = ResolvedVarRef {
            container: Some(&plain),
            variable: Variable::Port(&out),
        };
        assert_eq!(lower_port_ref(&banked, Some(2), None).unwrap(), "c[2].out");
        assert_eq!(lower_port_ref(&banked, Some(-1), None).unwrap(), "c.out");
        assert_eq!(lower_port_ref(&banked, None, Some(1)).unwrap(), "c.out");
        assert_eq!(lower_port_ref(&unbanked, Some(2), None).unwrap(), "c.out");
    }

    #[test]
    fn port_ref_multiport_subscript_only_on_multiports() {
        let multi = port("out", Some(WidthSpec::literal(3)));
        let bank = inst("c", Some(WidthSpec::literal(2)));
        let local = ResolvedVarRef {
            container: None,
            variable: Variable::Port(&multi),
        };
        let both = ResolvedVarRef {
            container: Some(&bank),
            variable: Variable::Port(&multi),
        };
        assert_eq!(lower_port_ref(&local, None, Some(1)).unwrap(), "out[1]");
        assert_eq!(lower_port_ref(&local, Some(5), None).unwrap(), "out");
        assert_eq!(
            lower_port_ref(&both, Some(0), Some(2)).unwrap(),
            "c[0].out[2]"
        );
    }

    #[test]
    fn port_ref_on_non_port_is_invalid_for_any_indices() {
        let action = Action {
            name: "a".to_string(),
            origin: Default::default(),
            ty: None,
        };
        let timer = Timer {
            name: "t".to_string(),
            offset: None,
            period: None,
        };
        let refs = [
            ResolvedVarRef {
                container: None,
                variable: Variable::Action(&action),
            },
            ResolvedVarRef {
                container: None,
                variable: Variable::Timer(&timer),
            },
        ];
        for reference in &refs {
            for (bank, channel) in [(None, None), (Some(1), Some(1)), (Some(-1), None)] {
                let err = lower_port_ref(reference, bank, channel).unwrap_err();
                assert!(matches!(err, CodegenError::InvalidReferenceKind { .. }));
            }
        }
    }
}
