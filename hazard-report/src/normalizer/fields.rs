//! Field-level coercions shared by entry and top-level normalization.

use serde_json::{Map, Value};

use super::coercion::{CoercionContext, CoercionKind};
use crate::report::{MovementRisk, RiskLevel};

/// An enumeration with an `unknown` sentinel and exact labels.
pub(crate) trait RiskScale: Copy {
    const UNKNOWN: Self;

    fn from_label(label: &str) -> Option<Self>;
}

impl RiskScale for RiskLevel {
    const UNKNOWN: Self = RiskLevel::Unknown;

    fn from_label(label: &str) -> Option<Self> {
        RiskLevel::from_label(label)
    }
}

impl RiskScale for MovementRisk {
    const UNKNOWN: Self = MovementRisk::Unknown;

    fn from_label(label: &str) -> Option<Self> {
        MovementRisk::from_label(label)
    }
}

/// Reads `key` as free text, falling back to `default`.
///
/// Strings pass through. Numbers and booleans become their JSON text.
/// Absent keys, `null`, arrays and objects yield `default`.
pub(crate) fn text(
    ctx: &mut CoercionContext,
    obj: &Map<String, Value>,
    key: &str,
    default: &str,
) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => {
            ctx.coerce(key, CoercionKind::Stringified { original: v.clone() });
            v.to_string()
        }
        Some(other) => {
            ctx.coerce(
                key,
                CoercionKind::Replaced {
                    original: other.clone(),
                    replacement: Value::from(default),
                },
            );
            default.to_string()
        }
        None => {
            ctx.coerce(
                key,
                CoercionKind::DefaultInserted {
                    default: Value::from(default),
                },
            );
            default.to_string()
        }
    }
}

/// Reads `key` as a member of `R`, coercing anything else to unknown.
pub(crate) fn risk<R: RiskScale>(
    ctx: &mut CoercionContext,
    obj: &Map<String, Value>,
    key: &str,
) -> R {
    match obj.get(key) {
        Some(Value::String(s)) => {
            if let Some(risk) = R::from_label(s) {
                return risk;
            }
            replace_with_unknown(ctx, key, Value::String(s.clone()))
        }
        Some(other) => replace_with_unknown(ctx, key, other.clone()),
        None => {
            ctx.coerce(
                key,
                CoercionKind::DefaultInserted {
                    default: Value::from("unknown"),
                },
            );
            R::UNKNOWN
        }
    }
}

fn replace_with_unknown<R: RiskScale>(ctx: &mut CoercionContext, key: &str, original: Value) -> R {
    ctx.coerce(
        key,
        CoercionKind::Replaced {
            original,
            replacement: Value::from("unknown"),
        },
    );
    R::UNKNOWN
}

/// Reads `key` as a non-negative integer count, resetting anything else to 0.
pub(crate) fn count(ctx: &mut CoercionContext, obj: &Map<String, Value>, key: &str) -> u64 {
    match obj.get(key) {
        Some(value) => match value.as_u64() {
            Some(n) => n,
            None => {
                ctx.coerce(
                    key,
                    CoercionKind::Replaced {
                        original: value.clone(),
                        replacement: Value::from(0),
                    },
                );
                0
            }
        },
        None => {
            ctx.coerce(
                key,
                CoercionKind::DefaultInserted {
                    default: Value::from(0),
                },
            );
            0
        }
    }
}

/// Renders a source value for an error message.
///
/// Strings appear without quotes; everything else as compact JSON.
pub(crate) fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
