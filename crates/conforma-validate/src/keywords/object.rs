//! # Object Keywords
//!
//! `properties`/`patternProperties`/`additionalProperties` are one
//! validator: `additionalProperties` only sees keys matched by neither of
//! the other two, so the trio shares one pass over the value. Every key
//! that was checked is recorded as evaluated for `unevaluatedProperties`.
//!
//! `dependencies` keeps the draft-4/6/7 dual form (array = conditional
//! required, schema = conditional sub-schema); 2019-09 splits it into
//! `dependentRequired` and `dependentSchemas`.

use serde_json::{Map, Number, Value};

use conforma_core::{ErrorCode, Invalid, InvalidDetail};

use crate::context::{Context, Validation};
use crate::keywords::validate_schema;

/// The `properties`/`patternProperties`/`additionalProperties` trio.
pub fn properties(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let props = schema.get("properties").and_then(Value::as_object);
    let patterns = schema.get("patternProperties").and_then(Value::as_object);
    let additional = schema.get("additionalProperties");
    if props.is_none() && patterns.is_none() && additional.is_none() {
        return Validation::ok();
    }
    let Some(members) = value.as_object() else {
        return Validation::ok();
    };

    let mut out = Validation::ok();
    let mut unexpected: Vec<String> = Vec::new();
    for (key, member) in members {
        let mut matched = false;
        if let Some(sub) = props.and_then(|p| p.get(key)) {
            matched = true;
            out.merge(validate_schema(sub, member, &ctx.for_key(key)));
            out.evaluated_properties.insert(key.clone());
        }
        if let Some(patterns) = patterns {
            // A key may match zero or more patterns; each match applies.
            for (pattern, sub) in patterns {
                let applies = regex::Regex::new(pattern)
                    .map(|re| re.is_match(key))
                    .unwrap_or(false);
                if applies {
                    matched = true;
                    out.merge(validate_schema(sub, member, &ctx.for_key(key)));
                    out.evaluated_properties.insert(key.clone());
                }
            }
        }
        if !matched {
            match additional {
                Some(Value::Bool(false)) => unexpected.push(key.clone()),
                Some(sub) => {
                    out.merge(validate_schema(sub, member, &ctx.for_key(key)));
                    out.evaluated_properties.insert(key.clone());
                }
                None => {}
            }
        }
    }
    if !unexpected.is_empty() {
        out.errors.push(Invalid::new(
            ErrorCode::AdditionalProperties,
            ctx.path.clone(),
            InvalidDetail::Keys(unexpected),
        ));
    }
    out
}

/// `required`.
pub fn required(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some(Value::Array(names)) = schema.get("required") else {
        return Validation::ok();
    };
    let Some(members) = value.as_object() else {
        return Validation::ok();
    };
    let missing: Vec<String> = names
        .iter()
        .filter_map(Value::as_str)
        .filter(|name| !members.contains_key(*name))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        ErrorCode::Required,
        ctx.path.clone(),
        InvalidDetail::Keys(missing),
    ))
}

/// `minProperties`.
pub fn min_properties(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    property_bound(schema, value, ctx, "minProperties", ErrorCode::MinProperties, |n, limit| {
        n >= limit
    })
}

/// `maxProperties`.
pub fn max_properties(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    property_bound(schema, value, ctx, "maxProperties", ErrorCode::MaxProperties, |n, limit| {
        n <= limit
    })
}

fn property_bound(
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
    let Some(members) = value.as_object() else {
        return Validation::ok();
    };
    if holds(members.len() as u64, limit) {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        code,
        ctx.path.clone(),
        InvalidDetail::Limit(Number::from(limit)),
    ))
}

/// `propertyNames`: every key, as a string value, must satisfy the
/// sub-schema. Offending keys are reported together.
pub fn property_names(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some(sub) = schema.get("propertyNames") else {
        return Validation::ok();
    };
    let Some(members) = value.as_object() else {
        return Validation::ok();
    };
    let offending: Vec<String> = members
        .keys()
        .filter(|key| {
            !validate_schema(sub, &Value::String((*key).clone()), &ctx.for_branch()).is_clean()
        })
        .cloned()
        .collect();
    if offending.is_empty() {
        return Validation::ok();
    }
    Validation::fail(Invalid::new(
        ErrorCode::PropertyNames,
        ctx.path.clone(),
        InvalidDetail::Keys(offending),
    ))
}

/// `dependencies`, dual form (draft-4/6/7).
pub fn dependencies(schema: &Map<String, Value>, value: &Value, ctx: &Context<'_>) -> Validation {
    let Some(deps) = schema.get("dependencies").and_then(Value::as_object) else {
        return Validation::ok();
    };
    let Some(members) = value.as_object() else {
        return Validation::ok();
    };
    let mut out = Validation::ok();
    for (trigger, dependent) in deps {
        if !members.contains_key(trigger) {
            continue;
        }
        match dependent {
            Value::Array(names) => {
                check_dependent_keys(trigger, names, members, ctx, ErrorCode::Dependencies, &mut out);
            }
            sub => out.merge(validate_schema(sub, value, &ctx.for_branch())),
        }
    }
    out
}

/// `dependentRequired` (draft 2019-09): the array form on its own.
pub fn dependent_required(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
) -> Validation {
    let Some(deps) = schema.get("dependentRequired").and_then(Value::as_object) else {
        return Validation::ok();
    };
    let Some(members) = value.as_object() else {
        return Validation::ok();
    };
    let mut out = Validation::ok();
    for (trigger, dependent) in deps {
        if !members.contains_key(trigger) {
            continue;
        }
        if let Value::Array(names) = dependent {
            check_dependent_keys(trigger, names, members, ctx, ErrorCode::DependentRequired, &mut out);
        }
    }
    out
}

/// `dependentSchemas` (draft 2019-09): the schema form on its own.
pub fn dependent_schemas(
    schema: &Map<String, Value>,
    value: &Value,
    ctx: &Context<'_>,
) -> Validation {
    let Some(deps) = schema.get("dependentSchemas").and_then(Value::as_object) else {
        return Validation::ok();
    };
    let Some(members) = value.as_object() else {
        return Validation::ok();
    };
    let mut out = Validation::ok();
    for (trigger, sub) in deps {
        if members.contains_key(trigger) {
            out.merge(validate_schema(sub, value, &ctx.for_branch()));
        }
    }
    out
}

fn check_dependent_keys(
    trigger: &str,
    names: &[Value],
    members: &Map<String, Value>,
    ctx: &Context<'_>,
    code: ErrorCode,
    out: &mut Validation,
) {
    let missing: Vec<String> = names
        .iter()
        .filter_map(Value::as_str)
        .filter(|name| !members.contains_key(*name))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        out.errors.push(Invalid::new(
            code,
            ctx.path.clone(),
            InvalidDetail::Dependency {
                on: trigger.to_string(),
                missing,
            },
        ));
    }
}
