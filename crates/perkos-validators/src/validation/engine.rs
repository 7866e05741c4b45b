//! Recursive application of rules to untyped values
//!
//! Copyright (c) 2025 PerkOS Team
//! Licensed under the Apache-2.0 license

use crate::validation::base::{Outcome, ValidationContext};
use crate::validation::error::{Violation, ViolationCode};
use crate::validation::rule::{Bound, EnumRule, NumberRule, ObjectRule, Rule, TextRule};
use serde_json::{Map, Value};

/// Largest integer a JSON number carries exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Apply `rule` to `value` starting at the root
pub fn apply(rule: &Rule, value: &Value) -> Outcome {
    let mut violations = Vec::new();
    match apply_at(rule, value, &ValidationContext::root(), &mut violations) {
        Some(normalized) if violations.is_empty() => Outcome::Accepted(normalized),
        _ => Outcome::Rejected(violations),
    }
}

/// Apply `rule` at `ctx`, pushing violations into `out`.
///
/// Returns the normalized value only when this node and all of its children
/// were accepted.
fn apply_at(
    rule: &Rule,
    value: &Value,
    ctx: &ValidationContext,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let result = match rule {
        Rule::Text(text) => check_text(text, value, ctx),
        Rule::Number(number) => check_number(number, value, ctx),
        Rule::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            other => Err(type_mismatch(ctx, "boolean", other)),
        },
        Rule::Enum(allowed) => check_enum(allowed, value, ctx),
        Rule::Any => Ok(value.clone()),
        Rule::List(element) => return apply_list(element, value, ctx, out),
        Rule::Object(object) => return apply_object(object, value, ctx, out),
        Rule::Record(inner) => return apply_record(inner, value, ctx, out),
        Rule::Union(alternatives) => return apply_union(alternatives, value, ctx, out),
    };

    match result {
        Ok(normalized) => Some(normalized),
        Err(violation) => {
            out.push(violation);
            None
        }
    }
}

fn apply_object(
    object: &ObjectRule,
    value: &Value,
    ctx: &ValidationContext,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let Value::Object(input) = value else {
        out.push(type_mismatch(ctx, "object", value));
        return None;
    };

    let before = out.len();
    let mut normalized = Map::new();

    for field in object.fields() {
        match input.get(&field.name) {
            Some(present) => {
                let child = ctx.child(&field.name);
                if let Some(accepted) = apply_at(&field.rule, present, &child, out) {
                    normalized.insert(field.name.clone(), accepted);
                }
            }
            None if field.required => {
                out.push(
                    ctx.child(&field.name)
                        .violation(ViolationCode::MissingRequired, "Required"),
                );
            }
            None => {
                if let Some(default) = &field.default {
                    normalized.insert(field.name.clone(), default.clone());
                }
            }
        }
    }

    (out.len() == before).then_some(Value::Object(normalized))
}

fn apply_list(
    element: &Rule,
    value: &Value,
    ctx: &ValidationContext,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let Value::Array(items) = value else {
        out.push(type_mismatch(ctx, "array", value));
        return None;
    };

    let mut normalized = Vec::with_capacity(items.len());
    let mut failed = false;
    for (index, item) in items.iter().enumerate() {
        match apply_at(element, item, &ctx.child_index(index), out) {
            Some(accepted) => normalized.push(accepted),
            None => failed = true,
        }
    }

    (!failed).then_some(Value::Array(normalized))
}

fn apply_record(
    inner: &Rule,
    value: &Value,
    ctx: &ValidationContext,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let Value::Object(entries) = value else {
        out.push(type_mismatch(ctx, "object", value));
        return None;
    };

    let mut normalized = Map::new();
    let mut failed = false;
    for (key, entry) in entries {
        match apply_at(inner, entry, &ctx.child(key), out) {
            Some(accepted) => {
                normalized.insert(key.clone(), accepted);
            }
            None => failed = true,
        }
    }

    (!failed).then_some(Value::Object(normalized))
}

fn apply_union(
    alternatives: &[Rule],
    value: &Value,
    ctx: &ValidationContext,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let mut attempts = Vec::with_capacity(alternatives.len());
    for alternative in alternatives {
        let mut scratch = Vec::new();
        if let Some(accepted) = apply_at(alternative, value, ctx, &mut scratch) {
            return Some(accepted);
        }
        attempts.push(scratch);
    }

    // Report the first alternative that at least agreed on the JSON type.
    let typed_attempt = attempts.into_iter().find(|violations| {
        !matches!(
            violations.as_slice(),
            [only] if only.code == ViolationCode::InvalidType && only.path == ctx.path
        )
    });

    match typed_attempt {
        Some(violations) if !violations.is_empty() => out.extend(violations),
        _ => out.push(ctx.violation(
            ViolationCode::InvalidType,
            format!("Invalid input: no alternative accepts {}", type_name(value)),
        )),
    }
    None
}

fn check_text(rule: &TextRule, value: &Value, ctx: &ValidationContext) -> Result<Value, Violation> {
    let Value::String(text) = value else {
        return Err(type_mismatch(ctx, "string", value));
    };
    let length = text.chars().count();

    if let Some(min) = rule.min_length {
        if length < min {
            let code = if length == 0 {
                ViolationCode::MissingRequired
            } else {
                ViolationCode::OutOfRange
            };
            let message = rule.min_message.clone().unwrap_or_else(|| {
                format!("String must contain at least {} character(s)", min)
            });
            return Err(ctx.violation(code, message));
        }
    }

    if let Some(max) = rule.max_length {
        if length > max {
            let message = rule.max_message.clone().unwrap_or_else(|| {
                format!("String must contain at most {} character(s)", max)
            });
            return Err(ctx.violation(ViolationCode::TooLong, message));
        }
    }

    if let Some(pattern) = &rule.pattern {
        if !pattern.regex.is_match(text) {
            return Err(ctx.violation(ViolationCode::PatternMismatch, pattern.message.clone()));
        }
    }

    if rule.url && url::Url::parse(text).is_err() {
        return Err(ctx.violation(ViolationCode::PatternMismatch, "Invalid url"));
    }

    Ok(value.clone())
}

fn check_number(
    rule: &NumberRule,
    value: &Value,
    ctx: &ValidationContext,
) -> Result<Value, Violation> {
    let number = match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        _ => None,
    };
    let Some(number) = number else {
        return Err(type_mismatch(ctx, "number", value));
    };

    if rule.integer && number.fract() != 0.0 {
        return Err(ctx.violation(
            ViolationCode::InvalidType,
            "Expected integer, received float",
        ));
    }

    if rule.integer && number.abs() > MAX_SAFE_INTEGER {
        return Err(ctx.violation(
            ViolationCode::OutOfRange,
            "Number must be a safe integer",
        ));
    }

    if let Some(min) = rule.min {
        if !satisfies_lower(min, number) {
            let relation = if min.inclusive {
                "greater than or equal to"
            } else {
                "greater than"
            };
            return Err(ctx.violation(
                ViolationCode::OutOfRange,
                format!("Number must be {} {}", relation, min.value),
            ));
        }
    }

    if let Some(max) = rule.max {
        if !satisfies_upper(max, number) {
            let relation = if max.inclusive {
                "less than or equal to"
            } else {
                "less than"
            };
            return Err(ctx.violation(
                ViolationCode::OutOfRange,
                format!("Number must be {} {}", relation, max.value),
            ));
        }
    }

    if rule.integer {
        Ok(canonical_integer(value, number))
    } else {
        Ok(value.clone())
    }
}

fn check_enum(rule: &EnumRule, value: &Value, ctx: &ValidationContext) -> Result<Value, Violation> {
    let Value::String(text) = value else {
        return Err(type_mismatch(ctx, "string", value));
    };

    if rule.contains(text) {
        Ok(value.clone())
    } else {
        let expected = rule
            .values
            .iter()
            .map(|v| format!("'{}'", v))
            .collect::<Vec<_>>()
            .join(" | ");
        Err(ctx.violation(
            ViolationCode::InvalidEnumValue,
            format!("Invalid enum value. Expected {}, received '{}'", expected, text),
        ))
    }
}

fn satisfies_lower(bound: Bound, number: f64) -> bool {
    if bound.inclusive {
        number >= bound.value
    } else {
        number > bound.value
    }
}

fn satisfies_upper(bound: Bound, number: f64) -> bool {
    if bound.inclusive {
        number <= bound.value
    } else {
        number < bound.value
    }
}

/// Re-encode an integral number as a JSON integer (`3.0` becomes `3`)
///
/// Callers have already bounded `number` by [`MAX_SAFE_INTEGER`].
fn canonical_integer(value: &Value, number: f64) -> Value {
    if value.is_i64() || value.is_u64() {
        value.clone()
    } else {
        Value::from(number as i64)
    }
}

fn type_mismatch(ctx: &ValidationContext, expected: &str, value: &Value) -> Violation {
    ctx.violation(
        ViolationCode::InvalidType,
        format!("Expected {}, received {}", expected, type_name(value)),
    )
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
