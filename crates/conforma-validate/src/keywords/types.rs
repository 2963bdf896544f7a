//! # `type`, `enum`, `const`
//!
//! Kind checks and literal checks. Integer widens to number but never the
//! reverse; `const` is `enum` with a single literal and reports the same
//! error code; the OpenAPI variant treats `nullable: true` as implicitly
//! adding `null` to the allowed type set.

use serde_json::{Map, Value};

use conforma_core::{deep_equal, matches_type, ErrorCode, Invalid, InvalidDetail};

use crate::context::{Context, Validation};

/// The `type` keyword, strict null handling (all JSON Schema drafts).
pub fn type_kind(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    check_type(schema, value, ctx, false)
}

/// The `type` keyword with OpenAPI `nullable: true` widening.
pub fn type_nullable(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    check_type(schema, value, ctx, true)
}

fn check_type(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
    nullable_aware: bool,
) -> Validation {
    let names: Vec<String> = match schema.get("type") {
        Some(Value::String(name)) => vec![name.clone()],
        Some(Value::Array(list)) => list
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => return Validation::ok(),
    };
    if nullable_aware
        && value.is_null()
        && schema.get("nullable").and_then(Value::as_bool).unwrap_or(false)
    {
        return Validation::ok();
    }
    if names.iter().any(|name| matches_type(value, name)) {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        ErrorCode::Type,
        ctx.path.clone(),
        InvalidDetail::Types(names),
    ))
}

/// The `enum` keyword: the value must deep-equal one listed literal.
pub fn enum_of(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some(Value::Array(allowed)) = schema.get("enum") else {
        return Validation::ok();
    };
    if allowed.iter().any(|literal| deep_equal(literal, value)) {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        ErrorCode::Enum,
        ctx.path.clone(),
        InvalidDetail::Allowed(allowed.clone()),
    ))
}

/// The `const` keyword, defined as `enum` with a single literal.
pub fn const_of(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some(literal) = schema.get("const") else {
        return Validation::ok();
    };
    if deep_equal(literal, value) {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        ErrorCode::Enum,
        ctx.path.clone(),
        InvalidDetail::Allowed(vec![literal.clone()]),
    ))
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
    fn test_single_and_multi_type() {
        assert!(run(json!({"type": "string"}), json!("x"), Draft::Draft7).is_clean());
        assert!(!run(json!({"type": "string"}), json!(1), Draft::Draft7).is_clean());
        assert!(run(json!({"type": ["string", "null"]}), json!(null), Draft::Draft7).is_clean());
    }

    #[test]
    fn test_integer_widening_is_one_directional() {
        assert!(run(json!({"type": "number"}), json!(3), Draft::Draft7).is_clean());
        assert!(!run(json!({"type": "integer"}), json!(3.5), Draft::Draft7).is_clean());
        // An integral float is an integer.
        assert!(run(json!({"type": "integer"}), json!(3.0), Draft::Draft7).is_clean());
    }

    #[test]
    fn test_nullable_is_openapi_only() {
        let schema = json!({"type": "string", "nullable": true});
        assert!(run(schema.clone(), json!(null), Draft::OpenApi3).is_clean());
        assert!(!run(schema, json!(null), Draft::Draft7).is_clean());
    }

    #[test]
    fn test_enum_uses_structural_equality() {
        let schema = json!({"enum": [{"a": 1}, "x", 2]});
        assert!(run(schema.clone(), json!({"a": 1.0}), Draft::Draft7).is_clean());
        let result = run(schema, json!("y"), Draft::Draft7);
        assert_eq!(result.errors[0].code, ErrorCode::Enum);
    }

    #[test]
    fn test_const_reports_enum_code() {
        let result = run(json!({"const": 5}), json!(6), Draft::Draft7);
        assert_eq!(result.errors[0].code, ErrorCode::Enum);
        assert_eq!(
            result.errors[0].detail,
            InvalidDetail::Allowed(vec![json!(5)])
        );
    }
}
