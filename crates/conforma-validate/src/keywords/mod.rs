//! # Keyword Validators and the Shared Dispatcher
//!
//! [`validate_schema`] is the engine's single entry point for one
//! `(schema, value)` pair. Boolean schemas short-circuit; object schemas
//! run the dialect's ordered pipeline, threading the evaluated-set
//! accumulation from each keyword into the context seen by the next —
//! which is how `unevaluatedProperties`/`unevaluatedItems`, ordered last,
//! observe every sibling annotation.
//!
//! A `skip_rest` result (legacy `$ref`) ends the pipeline immediately:
//! only the ref result is returned, sibling keywords never run.

pub mod array;
pub mod combinator;
pub mod format;
pub mod numeric;
pub mod object;
pub mod reference;
pub mod string;
pub mod types;

use conforma_core::{ErrorCode, Invalid, InvalidDetail};
use serde_json::Value;

use crate::context::{Context, Validation};

/// Validate `value` against `schema` under the context's dialect.
pub fn validate_schema(schema: &Value, value: &Value, ctx: &Context<'_>) -> Validation {
    match schema {
        // The literal `true` matches everything, `false` nothing.
        Value::Bool(true) => Validation::ok(),
        Value::Bool(false) => Validation::fail(Invalid::new(
            ErrorCode::False,
            ctx.path.clone(),
            InvalidDetail::None,
        )),
        Value::Object(map) => {
            let mut out = Validation::ok();
            let mut scope = ctx.for_branch();
            for keyword in ctx.draft.keywords() {
                let result = keyword(map, value, &scope);
                if result.skip_rest {
                    return result;
                }
                scope
                    .evaluated_properties
                    .extend(result.evaluated_properties.iter().cloned());
                scope.evaluated_items.extend(result.evaluated_items.iter().copied());
                out.merge(result);
            }
            out
        }
        // Anything else in schema position constrains nothing.
        _ => Validation::ok(),
    }
}
