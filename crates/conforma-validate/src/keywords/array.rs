//! # Array Keywords
//!
//! `items` carries the tuple-or-uniform split: a list of schemas applies
//! positionally with `additionalItems` governing the tail, a single
//! schema applies uniformly. The OpenAPI variant forbids trailing items
//! outright when `items` is a list and `additionalItems` is absent.
//!
//! Validated indices are recorded as evaluated for `unevaluatedItems`.

use serde_json::{Map, Number, Value};

use conforma_core::{unique, ErrorCode, Invalid, InvalidDetail};

use crate::context::{Context, Validation};
use crate::keywords::validate_schema;

/// `items`/`additionalItems`, list-draft semantics: a tuple without
/// `additionalItems` leaves trailing items unconstrained.
pub fn items(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    items_impl(schema, value, ctx, false)
}

/// `items`/`additionalItems`, OpenAPI semantics: a tuple without
/// `additionalItems` forbids trailing items.
pub fn items_strict(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    items_impl(schema, value, ctx, true)
}

fn items_impl(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
    strict_tail: bool,
) -> Validation {
    let Some(items_schema) = schema.get("items") else {
        return Validation::ok();
    };
    let Some(elements) = value.as_array() else {
        return Validation::ok();
    };
    let mut out = Validation::ok();
    match items_schema {
        Value::Array(positional) => {
            for (index, element) in elements.iter().enumerate() {
                if let Some(sub) = positional.get(index) {
                    out.merge(validate_schema(sub, element, &ctx.for_index(index)));
                    out.evaluated_items.insert(index);
                    continue;
                }
                match schema.get("additionalItems") {
                    Some(Value::Bool(false)) => {
                        out.errors.push(Invalid::new(
                            ErrorCode::AdditionalItems,
                            ctx.path.clone(),
                            InvalidDetail::Limit(Number::from(positional.len())),
                        ));
                        break;
                    }
                    Some(sub) => {
                        out.merge(validate_schema(sub, element, &ctx.for_index(index)));
                        out.evaluated_items.insert(index);
                    }
                    None if strict_tail => {
                        out.errors.push(Invalid::new(
                            ErrorCode::AdditionalItems,
                            ctx.path.clone(),
                            InvalidDetail::Limit(Number::from(positional.len())),
                        ));
                        break;
                    }
                    None => {}
                }
            }
        }
        uniform => {
            for (index, element) in elements.iter().enumerate() {
                out.merge(validate_schema(uniform, element, &ctx.for_index(index)));
                out.evaluated_items.insert(index);
            }
        }
    }
    out
}

/// `minItems`.
pub fn min_items(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    count_bound(schema, value, ctx, "minItems", ErrorCode::MinItems, |n, limit| n >= limit)
}

/// `maxItems`.
pub fn max_items(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    count_bound(schema, value, ctx, "maxItems", ErrorCode::MaxItems, |n, limit| n <= limit)
}

fn count_bound(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
    keyword: &str,
    code: ErrorCode,
    holds: fn(u64, u64) -> bool,
) -> Validation {
    let Some(limit) = schema.get(keyword).and_then(Value::as_u64) else {
        return Validation::ok();
    };
    let Some(elements) = value.as_array() else {
        return Validation::ok();
    };
    if holds(elements.len() as u64, limit) {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        code,
        ctx.path.clone(),
        InvalidDetail::Limit(Number::from(limit)),
    ))
}

/// `uniqueItems`: structural dedup via deep equality.
pub fn unique_items(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    if !schema.get("uniqueItems").and_then(Value::as_bool).unwrap_or(false) {
        return Validation::ok();
    }
    let Some(elements) = value.as_array() else {
        return Validation::ok();
    };
    if unique(elements).len() == elements.len() {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        ErrorCode::UniqueItems,
        ctx.path.clone(),
        InvalidDetail::None,
    ))
}

/// `contains`, draft-6/7 semantics: at least one element matches.
pub fn contains(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some(sub) = schema.get("contains") else {
        return Validation::ok();
    };
    let Some(elements) = value.as_array() else {
        return Validation::ok();
    };
    let mut out = Validation::ok();
    let mut matched = 0usize;
    for (index, element) in elements.iter().enumerate() {
        if validate_schema(sub, element, &ctx.for_index(index)).is_clean() {
            matched += 1;
            out.evaluated_items.insert(index);
        }
    }
    if matched == 0 {
        out.errors.push(Invalid::new(
            ErrorCode::Contains,
            ctx.path.clone(),
            InvalidDetail::None,
        ));
    }
    out
}

/// `contains` with `minContains`/`maxContains` (draft 2019-09).
/// `minContains: 0` makes the keyword vacuous even on an empty array.
pub fn contains_bounded(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
) -> Validation {
    let Some(sub) = schema.get("contains") else {
        return Validation::ok();
    };
    let Some(elements) = value.as_array() else {
        return Validation::ok();
    };
    let mut out = Validation::ok();
    let mut matched = 0u64;
    for (index, element) in elements.iter().enumerate() {
        if validate_schema(sub, element, &ctx.for_index(index)).is_clean() {
            matched += 1;
            out.evaluated_items.insert(index);
        }
    }
    let min = schema.get("minContains").and_then(Value::as_u64);
    let max = schema.get("maxContains").and_then(Value::as_u64);
    match min {
        Some(min) if matched < min => {
            out.errors.push(Invalid::new(
                ErrorCode::MinContains,
                ctx.path.clone(),
                InvalidDetail::Limit(Number::from(min)),
            ));
        }
        None if matched == 0 => {
            out.errors.push(Invalid::new(
                ErrorCode::Contains,
                ctx.path.clone(),
                InvalidDetail::None,
            ));
        }
        _ => {}
    }
    if let Some(max) = max {
        if matched > max {
            out.errors.push(Invalid::new(
                ErrorCode::MaxContains,
                ctx.path.clone(),
                InvalidDetail::Limit(Number::from(max)),
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::Draft;
    use conforma_core::RefTable;
    use serde_json::json;

    fn run(schema: Value, value: Value, draft: Draft) -> Validation {
        let refs = RefTable::new();
        let ctx = Context::new("value", draft, &refs);
        crate::keywords::validate_schema(&schema, &value, &ctx)
    }

    #[test]
    fn test_uniform_items() {
        let schema = json!({"items": {"type": "integer"}});
        assert!(run(schema.clone(), json!([1, 2, 3]), Draft::Draft7).is_clean());
        let result = run(schema, json!([1, "x", 3]), Draft::Draft7);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path.to_string(), "value[1]");
    }

    #[test]
    fn test_tuple_items_with_additional_schema() {
        let schema = json!({
            "items": [{"type": "string"}, {"type": "integer"}],
            "additionalItems": {"type": "boolean"}
        });
        assert!(run(schema.clone(), json!(["a", 1, true, false]), Draft::Draft7).is_clean());
        let result = run(schema, json!(["a", 1, "nope"]), Draft::Draft7);
        assert_eq!(result.errors[0].code, ErrorCode::Type);
        assert_eq!(result.errors[0].path.to_string(), "value[2]");
    }

    #[test]
    fn test_tuple_items_additional_false() {
        let schema = json!({"items": [{"type": "string"}], "additionalItems": false});
        let result = run(schema, json!(["a", "b"]), Draft::Draft7);
        assert_eq!(result.errors[0].code, ErrorCode::AdditionalItems);
    }

    #[test]
    fn test_tuple_tail_unconstrained_in_drafts_but_not_openapi() {
        let schema = json!({"items": [{"type": "string"}]});
        assert!(run(schema.clone(), json!(["a", 42]), Draft::Draft7).is_clean());
        let result = run(schema, json!(["a", 42]), Draft::OpenApi3);
        assert_eq!(result.errors[0].code, ErrorCode::AdditionalItems);
    }

    #[test]
    fn test_item_count_bounds() {
        assert!(!run(json!({"minItems": 2}), json!([1]), Draft::Draft7).is_clean());
        assert!(!run(json!({"maxItems": 1}), json!([1, 2]), Draft::Draft7).is_clean());
        assert!(run(json!({"minItems": 1, "maxItems": 2}), json!([1, 2]), Draft::Draft7).is_clean());
    }

    #[test]
    fn test_unique_items_structural() {
        let schema = json!({"uniqueItems": true});
        assert!(run(schema.clone(), json!([{"a": 1}, {"a": 2}]), Draft::Draft7).is_clean());
        // 1 and 1.0 are the same number structurally.
        let result = run(schema, json!([1, 1.0]), Draft::Draft7);
        assert_eq!(result.errors[0].code, ErrorCode::UniqueItems);
    }

    #[test]
    fn test_contains() {
        let schema = json!({"contains": {"type": "integer"}});
        assert!(run(schema.clone(), json!(["a", 2]), Draft::Draft7).is_clean());
        let result = run(schema, json!(["a", "b"]), Draft::Draft7);
        assert_eq!(result.errors[0].code, ErrorCode::Contains);
    }

    #[test]
    fn test_contains_bounds() {
        let schema = json!({"contains": {"type": "integer"}, "minContains": 2, "maxContains": 3});
        assert!(!run(schema.clone(), json!([1]), Draft::Draft201909).is_clean());
        assert!(run(schema.clone(), json!([1, 2, "x"]), Draft::Draft201909).is_clean());
        let result = run(schema, json!([1, 2, 3, 4]), Draft::Draft201909);
        assert_eq!(result.errors[0].code, ErrorCode::MaxContains);
    }

    #[test]
    fn test_min_contains_zero_accepts_empty() {
        let schema = json!({"contains": {"type": "integer"}, "minContains": 0});
        assert!(run(schema, json!([]), Draft::Draft201909).is_clean());
    }
}
