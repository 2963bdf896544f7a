//! # Combinators
//!
//! `allOf`/`anyOf`/`oneOf`/`not`, the conditionals, and the
//! `unevaluated*` keywords. Branches re-validate the same value, so they
//! receive the context's current evaluated sets — but sibling branches of
//! `allOf` never see each other's annotations; only the merged result
//! flows upward.
//!
//! `anyOf`/`oneOf` failures carry every branch's error list in the
//! record, which is what the formatter's nested `Schema N:` traces are
//! built from. `oneOf` with a single branch is a direct recursive call;
//! the OpenAPI variant honors `discriminator.propertyName` to pick one
//! branch without evaluating the others.

use serde_json::{Map, Value};

use conforma_core::{ErrorCode, Invalid, InvalidDetail, RefTable};

use crate::context::{Context, Validation};
use crate::keywords::validate_schema;

/// `allOf`: every branch applies; errors concatenate in declared order.
pub fn all_of(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some(Value::Array(branches)) = schema.get("allOf") else {
        return Validation::ok();
    };
    let mut out = Validation::ok();
    for branch in branches {
        out.merge(validate_schema(branch, value, &ctx.for_branch()));
    }
    out
}

/// `anyOf`: at least one branch must validate cleanly. On failure the
/// record carries one error list per branch.
pub fn any_of(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some(Value::Array(branches)) = schema.get("anyOf") else {
        return Validation::ok();
    };
    let results: Vec<Validation> = branches
        .iter()
        .map(|branch| validate_schema(branch, value, &ctx.for_branch()))
        .collect();
    if results.iter().any(Validation::is_clean) {
        let mut out = Validation::ok();
        for result in results.into_iter().filter(Validation::is_clean) {
            out.evaluated_properties.extend(result.evaluated_properties);
            out.evaluated_items.extend(result.evaluated_items);
        }
        return out;
    }
    Validation::fail(Invalid::new(
        ErrorCode::AnyOf,
        ctx.path.clone(),
        InvalidDetail::Branches(results.into_iter().map(|r| r.errors).collect()),
    ))
}

/// `oneOf`, generic path: exactly one branch must match. Discriminators
/// are deliberately ignored outside the OpenAPI dialect.
pub fn one_of(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some(Value::Array(branches)) = schema.get("oneOf") else {
        return Validation::ok();
    };
    one_of_branches(branches, value, ctx)
}

/// `oneOf` with OpenAPI discriminator support: when the value carries the
/// discriminator property, the engine narrows to the single branch whose
/// `properties[propertyName]` accepts the discriminant and never runs the
/// others.
pub fn one_of_discriminator(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
) -> Validation {
    let Some(Value::Array(branches)) = schema.get("oneOf") else {
        return Validation::ok();
    };
    let discriminant = schema
        .get("discriminator")
        .and_then(|d| d.get("propertyName"))
        .and_then(Value::as_str)
        .and_then(|name| value.get(name).map(|v| (name, v)));
    if let Some((name, discriminant)) = discriminant {
        for branch in branches {
            let effective = deref(branch, ctx.refs);
            let Some(prop_schema) = effective
                .get("properties")
                .and_then(|p| p.get(name))
            else {
                continue;
            };
            if validate_schema(prop_schema, discriminant, &ctx.for_branch()).is_clean() {
                return validate_schema(branch, value, &ctx.for_branch());
            }
        }
        // No branch accepts the discriminant; fall through to the
        // generic exactly-one check for a full per-branch trace.
    }
    one_of_branches(branches, value, ctx)
}

fn one_of_branches(branches: &[Value], value: &Value, ctx: &Context<'_>) -> Validation {
    // Single-branch oneOf is a direct recursive call.
    if branches.len() == 1 {
        return validate_schema(&branches[0], value, &ctx.for_branch());
    }
    let results: Vec<Validation> = branches
        .iter()
        .map(|branch| validate_schema(branch, value, &ctx.for_branch()))
        .collect();
    let matching = results.iter().filter(|r| r.is_clean()).count();
    if matching == 1 {
        let mut out = Validation::ok();
        for result in results.into_iter().filter(Validation::is_clean) {
            out.evaluated_properties.extend(result.evaluated_properties);
            out.evaluated_items.extend(result.evaluated_items);
        }
        return out;
    }
    Validation::fail(Invalid::new(
        ErrorCode::OneOf,
        ctx.path.clone(),
        InvalidDetail::Branches(results.into_iter().map(|r| r.errors).collect()),
    ))
}

/// Follow a `$ref` one step for schema introspection (discriminator
/// probing). A dangling key yields the node unchanged.
fn deref<'s>(schema: &'s Value, refs: &'s RefTable) -> &'s Value {
    match schema.get("$ref").and_then(Value::as_str) {
        Some(key) => refs.get(key).unwrap_or(schema),
        None => schema,
    }
}

/// `not`: inverted — zero errors from the sub-schema is the failure.
pub fn not_schema(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some(sub) = schema.get("not") else {
        return Validation::ok();
    };
    if validate_schema(sub, value, &ctx.for_branch()).is_clean() {
        return Validation::fail(Invalid::new(
            ErrorCode::Not,
            ctx.path.clone(),
            InvalidDetail::None,
        ));
    }
    Validation::ok()
}

/// `if`/`then`/`else`: the branch is chosen by whether `if` validates
/// cleanly; an absent branch is no error. A passing `if` contributes its
/// evaluation annotations.
pub fn if_then_else(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some(condition) = schema.get("if") else {
        return Validation::ok();
    };
    let condition_result = validate_schema(condition, value, &ctx.for_branch());
    let mut out = Validation::ok();
    if condition_result.is_clean() {
        out.evaluated_properties.extend(condition_result.evaluated_properties);
        out.evaluated_items.extend(condition_result.evaluated_items);
        if let Some(then_schema) = schema.get("then") {
            out.merge(validate_schema(then_schema, value, &ctx.for_branch()));
        }
    } else if let Some(else_schema) = schema.get("else") {
        out.merge(validate_schema(else_schema, value, &ctx.for_branch()));
    }
    out
}

/// `unevaluatedProperties`: constrains only keys not already marked
/// evaluated by any sibling keyword. Dialect ordering guarantees this
/// runs last.
pub fn unevaluated_properties(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
) -> Validation {
    let Some(sub) = schema.get("unevaluatedProperties") else {
        return Validation::ok();
    };
    let Some(members) = value.as_object() else {
        return Validation::ok();
    };
    let mut out = Validation::ok();
    let mut offending: Vec<String> = Vec::new();
    for (key, member) in members {
        if ctx.evaluated_properties.contains(key) {
            continue;
        }
        match sub {
            Value::Bool(false) => offending.push(key.clone()),
            _ => {
                out.merge(validate_schema(sub, member, &ctx.for_key(key)));
                out.evaluated_properties.insert(key.clone());
            }
        }
    }
    if !offending.is_empty() {
        out.errors.push(Invalid::new(
            ErrorCode::UnevaluatedProperties,
            ctx.path.clone(),
            InvalidDetail::Keys(offending),
        ));
    }
    out
}

/// `unevaluatedItems`: the array-index mirror of
/// [`unevaluated_properties`].
pub fn unevaluated_items(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
) -> Validation {
    let Some(sub) = schema.get("unevaluatedItems") else {
        return Validation::ok();
    };
    let Some(elements) = value.as_array() else {
        return Validation::ok();
    };
    let mut out = Validation::ok();
    let mut offending = false;
    for (index, element) in elements.iter().enumerate() {
        if ctx.evaluated_items.contains(&index) {
            continue;
        }
        match sub {
            Value::Bool(false) => offending = true,
            _ => {
                out.merge(validate_schema(sub, element, &ctx.for_index(index)));
                out.evaluated_items.insert(index);
            }
        }
    }
    if offending {
        out.errors.push(Invalid::new(
            ErrorCode::UnevaluatedItems,
            ctx.path.clone(),
            InvalidDetail::None,
        ));
    }
    out
}
