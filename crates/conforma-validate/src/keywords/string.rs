//! # String Keywords
//!
//! `pattern` and the length bounds. Lengths count Unicode code points,
//! not UTF-16 code units or bytes: `"😀"` has length 1.

use serde_json::{Map, Number, Value};

use conforma_core::{ErrorCode, Invalid, InvalidDetail};

use crate::context::{Context, Validation};

/// The `pattern` keyword. An uncompilable pattern is treated as no
/// constraint (see DESIGN.md).
pub fn pattern(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some(expr) = schema.get("pattern").and_then(Value::as_str) else {
        return Validation::ok();
    };
    let Some(s) = value.as_str() else {
        return Validation::ok();
    };
    match regex::Regex::new(expr) {
        Ok(re) if re.is_match(s) => Validation::ok(),
        Ok(_) => Validation::fail(Invalid::new(
            ErrorCode::Pattern,
            ctx.path.clone(),
            InvalidDetail::Pattern(expr.to_string()),
        )),
        Err(e) => {
            tracing::debug!(pattern = expr, error = %e, "uncompilable pattern ignored");
            Validation::ok()
        }
    }
}

/// `minLength` in code points.
pub fn min_length(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    length_bound(schema, value, ctx, "minLength", ErrorCode::MinLength, |n, limit| n >= limit)
}

/// `maxLength` in code points.
pub fn max_length(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    length_bound(schema, value, ctx, "maxLength", ErrorCode::MaxLength, |n, limit| n <= limit)
}

fn length_bound(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
    keyword: &str,
    code: ErrorCode,
    holds: fn(u64, u64) -> bool,
) -> Validation {
    let Some(Value::Number(raw)) = schema.get(keyword) else {
        return Validation::ok();
    };
    let Some(limit) = raw.as_u64() else {
        return Validation::ok();
    };
    let Some(s) = value.as_str() else {
        return Validation::ok();
    };
    let count = s.chars().count() as u64;
    if holds(count, limit) {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        code,
        ctx.path.clone(),
        InvalidDetail::Limit(Number::from(limit)),
    ))
}
