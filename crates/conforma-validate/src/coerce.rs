//! # Coercion — The Validation Mirror That Transforms
//!
//! Walks the same schema the same way validation does (ref → default →
//! properties → items → type conversion → oneOf → allOf → anyOf) but
//! rewrites the value instead of checking it.
//!
//! Two targets:
//! - `Json` fixes up values deserialized from JSON, which cannot natively
//!   represent dates: strings with `format: date`/`date-time` are parsed
//!   and re-emitted canonically (date-times normalized to UTC).
//! - `Query` converts query-string-originated strings into
//!   `integer`/`number`/`boolean`/`null` per the schema's `type`, using
//!   fixed boolean token sets and leaving anything lossy untouched
//!   (`"10.5"` against `type: integer` stays a string).
//!
//! Ambiguous `oneOf`/`anyOf` branches are settled by coercing each
//! branch's candidate and validating it — coercion is a genuine consumer
//! of the validation engine, not merely a sibling.
//!
//! Absent values thread through as `None`: a schema `default`
//! materializes them, and an object key whose coerced value comes back
//! absent is dropped from the result.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::context::{Context, MAX_REF_DEPTH};
use crate::keywords::validate_schema;

/// Which representation the value originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionTarget {
    /// JSON-deserialized values: only date strings need fixing.
    #[default]
    Json,
    /// Query-string values: everything arrives as a string.
    Query,
}

/// Coerce `value` (or materialize an absent one) against `schema`.
pub(crate) fn coerce_schema(
    schema: &Value,
    value: Option<Value>,
    ctx: &Context<'_>,
    target: CoercionTarget,
) -> Option<Value> {
    let Value::Object(map) = schema else {
        return value;
    };

    let mut value = value;
    if let Some(key) = map.get("$ref").and_then(Value::as_str) {
        if ctx.ref_depth < MAX_REF_DEPTH {
            if let Some(referenced) = ctx.refs.get(key) {
                let mut deeper = ctx.for_branch();
                deeper.ref_depth += 1;
                value = coerce_schema(referenced, value, &deeper, target);
            }
        }
    }

    if value.is_none() {
        if let Some(default) = map.get("default") {
            value = Some(default.clone());
        }
    }
    let mut current = value?;

    current = coerce_properties(map, current, ctx, target);
    current = coerce_items(map, current, ctx, target);
    current = convert_type(map, current, target);

    if let Some(Value::Array(branches)) = map.get("oneOf") {
        current = coerce_one_of(branches, current, ctx, target);
    }
    if let Some(Value::Array(branches)) = map.get("allOf") {
        for branch in branches {
            if let Some(next) = coerce_schema(branch, Some(current.clone()), ctx, target) {
                current = next;
            }
        }
    }
    if let Some(Value::Array(branches)) = map.get("anyOf") {
        current = coerce_any_of(branches, current, ctx, target);
    }

    Some(current)
}

fn coerce_properties(
    map: &Map<String, Value>,
    current: Value,
    ctx: &Context<'_>,
    target: CoercionTarget,
) -> Value {
    let props = map.get("properties").and_then(Value::as_object);
    let patterns = map.get("patternProperties").and_then(Value::as_object);
    let additional = map.get("additionalProperties").filter(|a| a.is_object());
    if props.is_none() && patterns.is_none() && additional.is_none() {
        return current;
    }
    let Value::Object(members) = current else {
        return current;
    };

    let mut out = Map::new();
    for (key, member) in members {
        // Same matching precedence as validation.
        let sub = props.and_then(|p| p.get(&key)).or_else(|| {
            patterns.and_then(|patterns| {
                patterns.iter().find_map(|(pattern, sub)| {
                    regex::Regex::new(pattern)
                        .ok()
                        .filter(|re| re.is_match(&key))
                        .map(|_| sub)
                })
            })
        });
        match sub.or(additional) {
            Some(sub) => {
                // A key coerced to absent is dropped from the result.
                if let Some(coerced) = coerce_schema(sub, Some(member), &ctx.for_key(&key), target)
                {
                    out.insert(key, coerced);
                }
            }
            None => {
                out.insert(key, member);
            }
        }
    }
    // Absent keys whose schema can materialize one (via `default`).
    if let Some(props) = props {
        for (key, sub) in props {
            if !out.contains_key(key) {
                if let Some(created) = coerce_schema(sub, None, &ctx.for_key(key), target) {
                    out.insert(key.clone(), created);
                }
            }
        }
    }
    Value::Object(out)
}

fn coerce_items(
    map: &Map<String, Value>,
    current: Value,
    ctx: &Context<'_>,
    target: CoercionTarget,
) -> Value {
    let Some(items_schema) = map.get("items") else {
        return current;
    };
    let Value::Array(elements) = current else {
        return current;
    };
    let coerced = elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            let sub = match items_schema {
                Value::Array(positional) => positional.get(index),
                uniform => Some(uniform),
            };
            match sub {
                Some(sub) => coerce_schema(sub, Some(element.clone()), &ctx.for_index(index), target)
                    .unwrap_or(element),
                None => element,
            }
        })
        .collect();
    Value::Array(coerced)
}

fn convert_type(map: &Map<String, Value>, current: Value, target: CoercionTarget) -> Value {
    match target {
        CoercionTarget::Json => convert_json(map, current),
        CoercionTarget::Query => convert_query(map, current),
    }
}

/// JSON target: canonicalize date strings; everything else is assumed to
/// already have the right type.
fn convert_json(map: &Map<String, Value>, current: Value) -> Value {
    let Value::String(s) = &current else {
        return current;
    };
    match map.get("format").and_then(Value::as_str) {
        Some("date-time") => match DateTime::parse_from_rfc3339(s) {
            Ok(parsed) => Value::String(
                parsed
                    .with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
            Err(_) => current,
        },
        // A valid date string is already canonical.
        _ => current,
    }
}

/// Query target: strings become typed values where the conversion is
/// lossless; anything else is left untouched.
fn convert_query(map: &Map<String, Value>, current: Value) -> Value {
    let Value::String(s) = &current else {
        return current;
    };
    let names: Vec<&str> = match map.get("type") {
        Some(Value::String(name)) => vec![name.as_str()],
        Some(Value::Array(list)) => list.iter().filter_map(Value::as_str).collect(),
        _ => return current,
    };
    for name in names {
        match name {
            "integer" => {
                if let Ok(i) = s.parse::<i64>() {
                    return Value::Number(i.into());
                }
            }
            "number" => {
                if let Some(n) = s.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                    return Value::Number(n);
                }
            }
            "boolean" => match s.as_str() {
                "true" | "yes" | "1" => return Value::Bool(true),
                "false" | "no" | "0" => return Value::Bool(false),
                _ => {}
            },
            "null" => {
                if s == "null" {
                    return Value::Null;
                }
            }
            _ => {}
        }
    }
    current
}

/// Pick the first branch whose coerced candidate validates cleanly;
/// original value if none does.
fn coerce_one_of(
    branches: &[Value],
    current: Value,
    ctx: &Context<'_>,
    target: CoercionTarget,
) -> Value {
    if branches.len() == 1 {
        return coerce_schema(&branches[0], Some(current.clone()), ctx, target).unwrap_or(current);
    }
    for branch in branches {
        let candidate = coerce_schema(branch, Some(current.clone()), ctx, target)
            .unwrap_or_else(|| current.clone());
        if validate_schema(branch, &candidate, &ctx.for_branch()).is_clean() {
            return candidate;
        }
    }
    current
}

/// Keep the coerced candidate only when exactly one branch accepts it;
/// original value otherwise.
fn coerce_any_of(
    branches: &[Value],
    current: Value,
    ctx: &Context<'_>,
    target: CoercionTarget,
) -> Value {
    let mut winners: Vec<Value> = Vec::new();
    for branch in branches {
        let candidate = coerce_schema(branch, Some(current.clone()), ctx, target)
            .unwrap_or_else(|| current.clone());
        if validate_schema(branch, &candidate, &ctx.for_branch()).is_clean() {
            winners.push(candidate);
            if winners.len() > 1 {
                break;
            }
        }
    }
    match winners.len() {
        1 => winners.remove(0),
        _ => current,
    }
}
