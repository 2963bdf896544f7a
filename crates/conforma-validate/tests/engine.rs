//! Public-API behavior across the resolver and both engines: the
//! coercion/validation mirror, oneOf exactness, nested error rendering,
//! and resolution closure.

use serde_json::{json, Value};

use conforma_core::{ErrorCode, InvalidDetail, ResolvedSchema};
use conforma_validate::{
    coerce, validate, CoerceOptions, CoercionTarget, Draft, MessageFormat, ValidateOptions,
};

fn query_opts() -> CoerceOptions {
    CoerceOptions {
        target: CoercionTarget::Query,
        ..CoerceOptions::default()
    }
}

#[test]
fn coercion_never_introduces_new_failures() {
    // For every query-coerced value that changed type, re-validating
    // yields no more errors than the original had.
    let cases = vec![
        (json!({"type": "integer"}), json!("10")),
        (json!({"type": "number"}), json!("1.5")),
        (json!({"type": "boolean"}), json!("yes")),
        (json!({"oneOf": [{"type": "null"}, {"type": "integer"}]}), json!("null")),
        (json!({"oneOf": [{"type": "null"}, {"type": "integer"}]}), json!("test")),
        (json!({"properties": {"page": {"type": "integer"}}}), json!({"page": "3"})),
    ];
    for (schema, original) in cases {
        let resolved = ResolvedSchema::inline(schema);
        let before = validate(&resolved, &original, &ValidateOptions::default())
            .errors
            .len();
        let coerced = coerce(&resolved, original.clone(), &query_opts());
        let after = validate(&resolved, &coerced, &ValidateOptions::default())
            .errors
            .len();
        assert!(
            after <= before,
            "coercion made things worse for {original}: {before} -> {after}"
        );
    }
}

#[test]
fn one_of_exactness_payload() {
    let schema = json!({
        "oneOf": [
            {"type": "object", "required": ["a"]},
            {"type": "object", "required": ["b"]},
            {"type": "string"}
        ]
    });
    let resolved = ResolvedSchema::inline(schema);

    // Exactly one branch: clean.
    let outcome = validate(&resolved, &json!({"a": 1}), &ValidateOptions::default());
    assert!(outcome.valid);

    // Two branches: a single oneOf error carrying one list per branch.
    let outcome = validate(&resolved, &json!({"a": 1, "b": 2}), &ValidateOptions::default());
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].code, ErrorCode::OneOf);
    match &outcome.errors[0].detail {
        InvalidDetail::Branches(branches) => assert_eq!(branches.len(), 3),
        other => panic!("expected Branches, got {other:?}"),
    }

    // Zero branches: same shape.
    let outcome = validate(&resolved, &json!(42), &ValidateOptions::default());
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].code, ErrorCode::OneOf);
}

#[test]
fn nested_one_of_message_rendering() {
    let schema = json!({"oneOf": [{"type": "null"}, {"type": "integer"}]});
    let resolved = ResolvedSchema::inline(schema);
    let outcome = validate(&resolved, &json!("x"), &ValidateOptions::default());
    let message = &outcome.messages[0];
    assert!(message.starts_with("[value] (oneOf) should match exactly one schema:"));
    assert!(message.contains("  Schema 1:"));
    assert!(message.contains("    [value] (type) should be of type 'null'"));
    assert!(message.contains("  Schema 2:"));
}

#[test]
fn error_paths_are_dotted_and_bracketed() {
    let schema = json!({
        "properties": {
            "query": {
                "properties": {
                    "pagination": {
                        "properties": {"page": {"type": "integer"}}
                    }
                }
            },
            "pets": {"items": {"properties": {"name": {"type": "string"}}}}
        }
    });
    let resolved = ResolvedSchema::inline(schema);
    let value = json!({
        "query": {"pagination": {"page": "one"}},
        "pets": [{"name": 3}]
    });
    let outcome = validate(&resolved, &value, &ValidateOptions::default());
    let paths: Vec<String> = outcome.errors.iter().map(|e| e.path.to_string()).collect();
    assert!(paths.contains(&"value.query.pagination.page".to_string()));
    assert!(paths.contains(&"value.pets[0].name".to_string()));
}

#[test]
fn draft_differences_on_one_schema() {
    // Boolean exclusiveMinimum is draft-4 style; the numeric form is
    // draft-6+. The same document must behave per dialect.
    let legacy = json!({"minimum": 5, "exclusiveMinimum": true});
    let resolved = ResolvedSchema::inline(legacy);
    let draft4 = ValidateOptions {
        draft: Draft::Draft4,
        ..ValidateOptions::default()
    };
    assert!(!validate(&resolved, &json!(5), &draft4).valid);
    assert!(validate(&resolved, &json!(6), &draft4).valid);
}

#[tokio::test]
async fn resolve_then_validate_closure() {
    // Every $ref reachable from the rewritten root or any table entry is
    // itself a table key (or a documented dangling no-op).
    let schema = json!({
        "$id": "http://example.com/order",
        "type": "object",
        "properties": {
            "item": {"$ref": "#/$defs/item"},
            "tags": {"items": {"$ref": "#/$defs/tag"}}
        },
        "$defs": {
            "item": {
                "type": "object",
                "properties": {"next": {"$ref": "#/$defs/item"}}
            },
            "tag": {"type": "string"}
        }
    });
    let resolved = conforma_resolver::compile(&schema).await.unwrap();

    fn collect_refs(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                if let Some(r) = map.get("$ref").and_then(Value::as_str) {
                    out.push(r.to_string());
                }
                for child in map.values() {
                    collect_refs(child, out);
                }
            }
            Value::Array(items) => items.iter().for_each(|i| collect_refs(i, out)),
            _ => {}
        }
    }

    let mut reachable = Vec::new();
    collect_refs(&resolved.schema, &mut reachable);
    for entry in resolved.refs.values() {
        collect_refs(entry, &mut reachable);
    }
    assert!(!reachable.is_empty());
    for key in reachable {
        assert!(
            resolved.refs.contains_key(&key),
            "dangling reference in closed table: {key}"
        );
    }

    // And a self-referential value validates through the table.
    let value = json!({"item": {"next": {"next": {}}}, "tags": ["a"]});
    assert!(validate(&resolved, &value, &ValidateOptions::default()).valid);
}

#[tokio::test]
async fn resolved_schema_is_shareable_across_tasks() {
    let schema = json!({"type": "object", "properties": {"n": {"type": "integer"}}});
    let resolved = std::sync::Arc::new(conforma_resolver::compile(&schema).await.unwrap());
    let mut handles = Vec::new();
    for i in 0..8 {
        let resolved = resolved.clone();
        handles.push(tokio::spawn(async move {
            let value = json!({"n": i});
            validate(&resolved, &value, &ValidateOptions::default()).valid
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap());
    }
}

#[tokio::test]
async fn resolve_and_validate_in_one_call() {
    let schema = json!({
        "$id": "http://example.com/pet",
        "properties": {"name": {"$ref": "#/$defs/name"}},
        "$defs": {"name": {"type": "string", "minLength": 1}}
    });
    let (outcome, resolved) = conforma_validate::resolve_and_validate(
        conforma_validate::SchemaSource::Inline(&schema),
        &json!({"name": ""}),
        &ValidateOptions::default(),
    )
    .await
    .unwrap();
    assert!(!outcome.valid);
    assert_eq!(outcome.errors[0].path.to_string(), "value.name");
    // The resolved schema is returned for reuse.
    assert!(validate(&resolved, &json!({"name": "rex"}), &ValidateOptions::default()).valid);
}

#[test]
fn raw_records_serialize_for_api_consumers() {
    let resolved = ResolvedSchema::inline(json!({"required": ["id"]}));
    let opts = ValidateOptions {
        format: MessageFormat::Raw,
        ..ValidateOptions::default()
    };
    let outcome = validate(&resolved, &json!({}), &opts);
    let encoded = serde_json::to_value(&outcome.errors).unwrap();
    assert_eq!(encoded[0]["code"], "required");
}
