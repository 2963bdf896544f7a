//! # Numeric Keywords
//!
//! Bounds and divisibility. `minimum`/`maximum` defer to the legacy
//! boolean `exclusiveMinimum`/`exclusiveMaximum` form when present
//! (draft-4 and OpenAPI 3 style); the numeric exclusive forms are
//! separate keywords from draft-6 onward.
//!
//! `multipleOf` works in scaled decimal space: both operands are scaled
//! by the larger of their decimal precisions before the divisibility
//! test, so `0.3 / 0.1` does not false-negative on binary floating
//! point. Non-finite operands are defined to fail.

use serde_json::{Map, Number, Value};

use conforma_core::{ErrorCode, Invalid, InvalidDetail};

use crate::context::{Context, Validation};

fn number_of(value: &Value) -> Option<f64> {
    value.as_f64()
}

fn limit(schema: &Map<String, Value>, keyword: &str) -> Option<(f64, Number)> {
    match schema.get(keyword) {
        Some(Value::Number(n)) => n.as_f64().map(|f| (f, n.clone())),
        _ => None,
    }
}

/// `minimum`, deferring to the legacy boolean `exclusiveMinimum`.
pub fn minimum(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some((min, raw)) = limit(schema, "minimum") else {
        return Validation::ok();
    };
    let Some(v) = number_of(value) else {
        return Validation::ok();
    };
    let exclusive = schema
        .get("exclusiveMinimum")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if exclusive {
        if v > min {
            return Validation::ok();
        }
        return Validation::fail(Invalid::new(
            ErrorCode::ExclusiveMinimum,
            ctx.path.clone(),
            InvalidDetail::Limit(raw),
        ));
    }
    if v >= min {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        ErrorCode::Minimum,
        ctx.path.clone(),
        InvalidDetail::Limit(raw),
    ))
}

/// `maximum`, deferring to the legacy boolean `exclusiveMaximum`.
pub fn maximum(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some((max, raw)) = limit(schema, "maximum") else {
        return Validation::ok();
    };
    let Some(v) = number_of(value) else {
        return Validation::ok();
    };
    let exclusive = schema
        .get("exclusiveMaximum")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if exclusive {
        if v < max {
            return Validation::ok();
        }
        return Validation::fail(Invalid::new(
            ErrorCode::ExclusiveMaximum,
            ctx.path.clone(),
            InvalidDetail::Limit(raw),
        ));
    }
    if v <= max {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        ErrorCode::Maximum,
        ctx.path.clone(),
        InvalidDetail::Limit(raw),
    ))
}

/// Numeric-form `exclusiveMinimum` (draft ≥ 6). The boolean form is
/// handled by [`minimum`] and skipped here.
pub fn exclusive_minimum(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
) -> Validation {
    let Some((min, raw)) = limit(schema, "exclusiveMinimum") else {
        return Validation::ok();
    };
    let Some(v) = number_of(value) else {
        return Validation::ok();
    };
    if v > min {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        ErrorCode::ExclusiveMinimum,
        ctx.path.clone(),
        InvalidDetail::Limit(raw),
    ))
}

/// Numeric-form `exclusiveMaximum` (draft ≥ 6).
pub fn exclusive_maximum(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
) -> Validation {
    let Some((max, raw)) = limit(schema, "exclusiveMaximum") else {
        return Validation::ok();
    };
    let Some(v) = number_of(value) else {
        return Validation::ok();
    };
    if v < max {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        ErrorCode::ExclusiveMaximum,
        ctx.path.clone(),
        InvalidDetail::Limit(raw),
    ))
}

/// `multipleOf` via decimal-precision scaling.
pub fn multiple_of(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some((divisor, raw)) = limit(schema, "multipleOf") else {
        return Validation::ok();
    };
    let Some(v) = number_of(value) else {
        return Validation::ok();
    };
    if is_multiple_of(v, divisor) {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        ErrorCode::MultipleOf,
        ctx.path.clone(),
        InvalidDetail::Limit(raw),
    ))
}

/// Divisibility without floating-point error: scale both operands into
/// integer space by the larger decimal precision, then test integer
/// divisibility. NaN and infinities are never multiples of anything.
pub(crate) fn is_multiple_of(value: f64, divisor: f64) -> bool {
    if !value.is_finite() || !divisor.is_finite() || divisor == 0.0 {
        return false;
    }
    let scale = 10f64.powi(decimal_precision(value).max(decimal_precision(divisor)));
    let scaled_value = value * scale;
    let scaled_divisor = divisor * scale;
    if scaled_value.abs() < 1e15 && scaled_divisor.abs() < 1e15 {
        let a = scaled_value.round() as i64;
        let b = scaled_divisor.round() as i64;
        if b != 0 {
            return a % b == 0;
        }
    }
    // Operands too large to scale into integer space; plain division is
    // exact in that range anyway.
    (value / divisor).fract() == 0.0
}

/// The smallest power of ten that makes the operand an integer, read off
/// the shortest decimal rendering (Rust's `Display` for `f64` never uses
/// exponent notation).
fn decimal_precision(x: f64) -> i32 {
    let rendered = format!("{x}");
    match rendered.split_once('.') {
        Some((_, fraction)) => fraction.len() as i32,
        None => 0,
    }
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
    fn test_inclusive_bounds() {
        assert!(run(json!({"minimum": 3}), json!(3), Draft::Draft7).is_clean());
        assert!(!run(json!({"minimum": 3}), json!(2.9), Draft::Draft7).is_clean());
        assert!(run(json!({"maximum": 3}), json!(3), Draft::Draft7).is_clean());
        assert!(!run(json!({"maximum": 3}), json!(3.1), Draft::Draft7).is_clean());
    }

    #[test]
    fn test_legacy_boolean_exclusive_minimum() {
        let schema = json!({"minimum": 3, "exclusiveMinimum": true});
        let result = run(schema.clone(), json!(3), Draft::Draft4);
        assert_eq!(result.errors[0].code, ErrorCode::ExclusiveMinimum);
        assert!(run(schema, json!(3.01), Draft::Draft4).is_clean());
    }

    #[test]
    fn test_numeric_exclusive_forms() {
        assert!(!run(json!({"exclusiveMinimum": 3}), json!(3), Draft::Draft7).is_clean());
        assert!(run(json!({"exclusiveMinimum": 3}), json!(4), Draft::Draft7).is_clean());
        assert!(!run(json!({"exclusiveMaximum": 3}), json!(3), Draft::Draft7).is_clean());
    }

    #[test]
    fn test_non_numbers_pass_numeric_keywords() {
        assert!(run(json!({"minimum": 3}), json!("abc"), Draft::Draft7).is_clean());
        assert!(run(json!({"multipleOf": 2}), json!([1]), Draft::Draft7).is_clean());
    }

    #[test]
    fn test_multiple_of_decimal_precision() {
        // 0.3 % 0.1 != 0 in binary floating point; scaling fixes it.
        assert!(run(json!({"multipleOf": 0.1}), json!(0.3), Draft::Draft7).is_clean());
        assert!(run(json!({"multipleOf": 0.01}), json!(19.99), Draft::Draft7).is_clean());
        assert!(!run(json!({"multipleOf": 0.1}), json!(0.35), Draft::Draft7).is_clean());
        assert!(run(json!({"multipleOf": 2}), json!(10), Draft::Draft7).is_clean());
        assert!(!run(json!({"multipleOf": 2}), json!(7), Draft::Draft7).is_clean());
    }

    #[test]
    fn test_non_finite_operands_fail() {
        // serde_json cannot represent NaN/Infinity, so the contract is
        // enforced at the helper level.
        assert!(!is_multiple_of(f64::INFINITY, 2.0));
        assert!(!is_multiple_of(f64::NEG_INFINITY, 2.0));
        assert!(!is_multiple_of(f64::NAN, 2.0));
        assert!(!is_multiple_of(4.0, f64::NAN));
        assert!(!is_multiple_of(4.0, 0.0));
    }

    #[test]
    fn test_multiple_of_large_operands() {
        // Too large for the scaled-integer path; plain division covers it.
        assert!(is_multiple_of(1e18, 1e9));
        assert!(is_multiple_of(4e18, 2e18));
    }
}
