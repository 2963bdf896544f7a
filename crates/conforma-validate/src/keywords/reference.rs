//! # `$ref` — Table Lookups, Two Disciplines
//!
//! Draft-4/6: validating the ref is the entire contract of the node —
//! sibling keywords are ignored (`skip_rest`). Draft-7 onward and
//! OpenAPI: the ref result combines with sibling keyword results.
//!
//! A key with no table entry is no constraint. This leniency is the
//! engine's documented behavior for dangling references; tightening it
//! would be an observable change.

use serde_json::{Map, Value};

use conforma_core::{ErrorCode, Invalid, InvalidDetail};

use crate::context::{Context, Validation, MAX_REF_DEPTH};
use crate::keywords::validate_schema;

/// Legacy discipline (draft ≤ 6): the ref replaces the schema node.
pub fn ref_replaces_node(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
) -> Validation {
    let Some(key) = schema.get("$ref").and_then(Value::as_str) else {
        return Validation::ok();
    };
    let mut result = follow(key, value, ctx);
    result.skip_rest = true;
    result
}

/// Modern discipline (draft ≥ 7, OpenAPI): ref result joins the
/// sibling keywords' results.
pub fn ref_with_siblings(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
) -> Validation {
    let Some(key) = schema.get("$ref").and_then(Value::as_str) else {
        return Validation::ok();
    };
    follow(key, value, ctx)
}

fn follow(key: &str, value: &Value, ctx: &Context<'_>) -> Validation {
    if ctx.ref_depth >= MAX_REF_DEPTH {
        // A ref cycle with no base case in the table is a caller error;
        // fail the value instead of overflowing the stack.
        tracing::warn!(key, "reference recursion limit reached");
        return Validation::fail(Invalid::new(
            ErrorCode::Ref,
            ctx.path.clone(),
            InvalidDetail::None,
        ));
    }
    match ctx.refs.get(key) {
        Some(target) => {
            let mut deeper = ctx.for_branch();
            deeper.ref_depth += 1;
            validate_schema(target, value, &deeper)
        }
        None => Validation::ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::Draft;
    use conforma_core::RefTable;
    use serde_json::json;

    fn table() -> RefTable {
        let mut refs = RefTable::new();
        refs.insert("http://x#/defs/int".to_string(), json!({"type": "integer"}));
        refs
    }

    #[test]
    fn test_legacy_ref_skips_siblings() {
        let refs = table();
        let ctx = Context::new("value", Draft::Draft4, &refs);
        // The sibling `type: string` would reject 5, but the ref replaces
        // the node entirely under the legacy discipline.
        let schema = json!({"$ref": "http://x#/defs/int", "type": "string"});
        let result = validate_schema(&schema, &json!(5), &ctx);
        assert!(result.is_clean(), "{:?}", result.errors);
    }

    #[test]
    fn test_modern_ref_validates_with_siblings() {
        let refs = table();
        let ctx = Context::new("value", Draft::Draft7, &refs);
        let schema = json!({"$ref": "http://x#/defs/int", "type": "string"});
        let result = validate_schema(&schema, &json!(5), &ctx);
        // The ref passes but the sibling type keyword fails.
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorCode::Type);
    }

    #[test]
    fn test_dangling_ref_is_no_constraint() {
        let refs = RefTable::new();
        let ctx = Context::new("value", Draft::Draft7, &refs);
        let schema = json!({"$ref": "http://nowhere#/missing"});
        assert!(validate_schema(&schema, &json!("anything"), &ctx).is_clean());
    }

    #[test]
    fn test_ref_cycle_fails_instead_of_overflowing() {
        let mut refs = RefTable::new();
        refs.insert("http://x#a".to_string(), json!({"$ref": "http://x#b"}));
        refs.insert("http://x#b".to_string(), json!({"$ref": "http://x#a"}));
        let ctx = Context::new("value", Draft::Draft7, &refs);
        let schema = json!({"$ref": "http://x#a"});
        let result = validate_schema(&schema, &json!(1), &ctx);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorCode::Ref);
    }

    #[test]
    fn test_self_referential_schema_terminates() {
        // A linked-list schema: {value: int, next: <self>}.
        let mut refs = RefTable::new();
        refs.insert(
            "http://x#node".to_string(),
            json!({
                "type": "object",
                "properties": {
                    "value": {"type": "integer"},
                    "next": {"$ref": "http://x#node"}
                }
            }),
        );
        let ctx = Context::new("value", Draft::Draft7, &refs);
        let schema = json!({"$ref": "http://x#node"});
        let list = json!({"value": 1, "next": {"value": 2, "next": {"value": "bad"}}});
        let result = validate_schema(&schema, &list, &ctx);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path.to_string(), "value.next.next.value");
    }
}
