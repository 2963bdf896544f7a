//! # Value Algebra — Structural Equality and Kind Probing
//!
//! The comparison primitives underneath `enum`, `const`, and `uniqueItems`,
//! plus the runtime-kind checks used by the `type` keyword.
//!
//! ## Numeric Equality
//!
//! `serde_json` distinguishes `Number(1)` from `Number(1.0)` because the
//! internal representations differ (i64 vs f64). JSON Schema does not:
//! both denote the same mathematical value. `deep_equal` therefore
//! compares numbers through `as_f64`, and `is_integer` accepts any finite
//! number with zero fractional part.

use serde_json::Value;

/// Structural deep equality over JSON value trees.
///
/// Numbers compare by mathematical value, objects by key set and
/// per-key equality, arrays element-wise in order.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(fx), Some(fy)) => fx == fy,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm
                    .iter()
                    .all(|(k, v)| ym.get(k).is_some_and(|w| deep_equal(v, w)))
        }
        _ => false,
    }
}

/// Filter a slice down to its structurally-distinct members, preserving
/// first-occurrence order. `uniqueItems` holds iff the result is as long
/// as the input.
pub fn unique(values: &[Value]) -> Vec<&Value> {
    let mut out: Vec<&Value> = Vec::new();
    for v in values {
        if !out.iter().any(|seen| deep_equal(seen, v)) {
            out.push(v);
        }
    }
    out
}

/// Whether the value is an integer in the JSON Schema sense: any finite
/// number with no fractional part, including `1.0`.
pub fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64()
                || n.is_u64()
                || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

/// The runtime kind of a value, named as the `type` keyword names it.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether a value satisfies a single `type` name.
///
/// Widening is one-directional: an integer satisfies `number`, but a
/// non-integral number never satisfies `integer`.
pub fn matches_type(value: &Value, type_name: &str) -> bool {
    match type_name {
        "null" => value.is_null(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => is_integer(value),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deep_equal_numbers_across_representations() {
        assert!(deep_equal(&json!(1), &json!(1.0)));
        assert!(deep_equal(&json!(0), &json!(-0.0)));
        assert!(!deep_equal(&json!(1), &json!(1.5)));
    }

    #[test]
    fn test_deep_equal_objects_ignore_key_order() {
        let a = json!({"x": 1, "y": [2, 3]});
        let b = json!({"y": [2, 3], "x": 1});
        assert!(deep_equal(&a, &b));
    }

    #[test]
    fn test_deep_equal_rejects_extra_keys() {
        assert!(!deep_equal(&json!({"x": 1}), &json!({"x": 1, "y": 2})));
    }

    #[test]
    fn test_deep_equal_mixed_kinds() {
        assert!(!deep_equal(&json!("1"), &json!(1)));
        assert!(!deep_equal(&json!(null), &json!(false)));
        assert!(!deep_equal(&json!([1]), &json!([1, 1])));
    }

    #[test]
    fn test_unique_filters_structural_duplicates() {
        let values = vec![json!(1), json!(1.0), json!({"a": 1}), json!({"a": 1.0})];
        let distinct = unique(&values);
        assert_eq!(distinct.len(), 2);
    }

    #[test]
    fn test_unique_preserves_order() {
        let values = vec![json!("b"), json!("a"), json!("b")];
        let distinct = unique(&values);
        assert_eq!(distinct, vec![&json!("b"), &json!("a")]);
    }

    #[test]
    fn test_is_integer_accepts_integral_float() {
        assert!(is_integer(&json!(10)));
        assert!(is_integer(&json!(10.0)));
        assert!(!is_integer(&json!(10.5)));
        assert!(!is_integer(&json!("10")));
    }

    #[test]
    fn test_matches_type_integer_widens_to_number() {
        assert!(matches_type(&json!(3), "number"));
        assert!(matches_type(&json!(3), "integer"));
        assert!(matches_type(&json!(3.5), "number"));
        assert!(!matches_type(&json!(3.5), "integer"));
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(kind_name(&json!(null)), "null");
        assert_eq!(kind_name(&json!(true)), "boolean");
        assert_eq!(kind_name(&json!(2)), "integer");
        assert_eq!(kind_name(&json!(2.5)), "number");
        assert_eq!(kind_name(&json!("s")), "string");
        assert_eq!(kind_name(&json!([])), "array");
        assert_eq!(kind_name(&json!({})), "object");
    }
}
