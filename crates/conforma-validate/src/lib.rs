//! # conforma-validate — Validation and Coercion Engines
//!
//! The keyword-interpreter core of conforma: five dialect pipelines over
//! a shared recursive dispatcher, evaluation-set bookkeeping for the
//! dynamic combinators, a mirroring coercion pass, and the error
//! formatter.
//!
//! ## Entry Points
//!
//! - [`validate`] — check a value against a [`ResolvedSchema`], returning
//!   an [`Outcome`] with raw [`Invalid`] records and (by default)
//!   rendered messages.
//! - [`ensure_valid`] — the thin adapter that converts a non-empty error
//!   list into a single [`SchemaNotValid`] error.
//! - [`coerce`] — transform a value toward the schema (`json` or `query`
//!   target) before validating it.
//! - [`resolve_and_validate`] — resolve an inline or URI-identified
//!   schema and validate in one call, returning the [`ResolvedSchema`]
//!   for reuse.
//! - [`validate_value`] — convenience for self-contained inline schemas
//!   with no reference table.
//!
//! ## Errors Are Data
//!
//! Validation never raises: "the value does not conform" is a list of
//! records, and only [`ensure_valid`] converts that into a Rust error.
//! The engine holds no state between calls; a [`ResolvedSchema`] may be
//! validated against many values concurrently.

pub mod coerce;
pub mod context;
pub mod draft;
pub mod keywords;
pub mod render;

use serde_json::Value;
use thiserror::Error;

use conforma_core::{Invalid, RefTable, ResolvedSchema};

pub use coerce::CoercionTarget;
pub use context::{Context, Validation};
pub use draft::{Draft, Keyword, UnknownDraft};
pub use keywords::validate_schema;
pub use render::{render, render_all, MessageFormat};

/// Options for one [`validate`] call.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Root name used in error paths (conventionally `"value"`).
    pub name: String,
    /// The dialect whose keyword pipeline applies.
    pub draft: Draft,
    /// How errors are surfaced.
    pub format: MessageFormat,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            name: "value".to_string(),
            draft: Draft::default(),
            format: MessageFormat::default(),
        }
    }
}

/// Options for one [`coerce`] call.
#[derive(Debug, Clone)]
pub struct CoerceOptions {
    /// Root name used in error paths while disambiguating branches.
    pub name: String,
    /// The dialect used when validating coerced candidates.
    pub draft: Draft,
    /// Which representation the value originated from.
    pub target: CoercionTarget,
}

impl Default for CoerceOptions {
    fn default() -> Self {
        Self {
            name: "value".to_string(),
            draft: Draft::default(),
            target: CoercionTarget::default(),
        }
    }
}

/// The result of a [`validate`] call.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Whether the value conforms.
    pub valid: bool,
    /// Raw error records, in pipeline order.
    pub errors: Vec<Invalid>,
    /// Rendered messages (empty under [`MessageFormat::Raw`]).
    pub messages: Vec<String>,
}

/// Validate a value against a resolved schema.
pub fn validate(resolved: &ResolvedSchema, value: &Value, opts: &ValidateOptions) -> Outcome {
    let ctx = Context::new(&opts.name, opts.draft, &resolved.refs);
    let result = validate_schema(&resolved.schema, value, &ctx);
    outcome(result.errors, opts.format)
}

/// Validate against a self-contained inline schema (no reference table).
pub fn validate_value(schema: &Value, value: &Value, opts: &ValidateOptions) -> Outcome {
    let refs = RefTable::new();
    let ctx = Context::new(&opts.name, opts.draft, &refs);
    let result = validate_schema(schema, value, &ctx);
    outcome(result.errors, opts.format)
}

fn outcome(errors: Vec<Invalid>, format: MessageFormat) -> Outcome {
    let messages = match format {
        MessageFormat::Raw => Vec::new(),
        MessageFormat::Human => render_all(&errors),
        MessageFormat::Custom(renderer) => errors.iter().map(renderer).collect(),
    };
    Outcome {
        valid: errors.is_empty(),
        errors,
        messages,
    }
}

/// The error raised by [`ensure_valid`] for a non-conforming value.
///
/// A convenience adapter only: the engine's contract is the record list.
#[derive(Error, Debug)]
#[error("value does not conform to schema:\n{}", messages.join("\n"))]
pub struct SchemaNotValid {
    /// Rendered messages, one per failure.
    pub messages: Vec<String>,
    /// The raw records behind them.
    pub errors: Vec<Invalid>,
}

/// Validate and convert any failure into a single [`SchemaNotValid`].
pub fn ensure_valid(
    resolved: &ResolvedSchema,
    value: &Value,
    opts: &ValidateOptions,
) -> Result<(), SchemaNotValid> {
    let result = validate(resolved, value, opts);
    if result.valid {
        return Ok(());
    }
    let messages = if result.messages.is_empty() {
        render_all(&result.errors)
    } else {
        result.messages
    };
    Err(SchemaNotValid {
        messages,
        errors: result.errors,
    })
}

/// Coerce a value toward the schema. Validation of the coerced value is
/// the caller's next step; coercion itself never fails.
pub fn coerce(resolved: &ResolvedSchema, value: Value, opts: &CoerceOptions) -> Value {
    let ctx = Context::new(&opts.name, opts.draft, &resolved.refs);
    coerce::coerce_schema(&resolved.schema, Some(value), &ctx, opts.target)
        .unwrap_or(Value::Null)
}

/// A schema to resolve before validating: inline or identified by URI.
#[derive(Debug, Clone, Copy)]
pub enum SchemaSource<'a> {
    /// An in-memory schema document.
    Inline(&'a Value),
    /// A root document location (path or URL).
    Uri(&'a str),
}

/// Resolve and validate in one call — the convenience wrapper consumed
/// by callers that do not manage [`ResolvedSchema`] values themselves.
/// Returns the outcome together with the resolved schema so the caller
/// can reuse it for further validations.
pub async fn resolve_and_validate(
    source: SchemaSource<'_>,
    value: &Value,
    opts: &ValidateOptions,
) -> Result<(Outcome, ResolvedSchema), conforma_resolver::ResolveError> {
    let resolved = match source {
        SchemaSource::Inline(schema) => conforma_resolver::compile(schema).await?,
        SchemaSource::Uri(uri) => conforma_resolver::compile_file(uri).await?,
    };
    let outcome = validate(&resolved, value, opts);
    Ok((outcome, resolved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_renders_by_default() {
        let resolved = ResolvedSchema::inline(json!({"type": "integer"}));
        let outcome = validate(&resolved, &json!("x"), &ValidateOptions::default());
        assert!(!outcome.valid);
        assert_eq!(outcome.messages.len(), 1);
        assert!(outcome.messages[0].starts_with("[value] (type)"));
    }

    #[test]
    fn test_raw_format_skips_rendering() {
        let resolved = ResolvedSchema::inline(json!({"type": "integer"}));
        let opts = ValidateOptions {
            format: MessageFormat::Raw,
            ..ValidateOptions::default()
        };
        let outcome = validate(&resolved, &json!("x"), &opts);
        assert!(outcome.messages.is_empty());
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn test_custom_renderer() {
        let resolved = ResolvedSchema::inline(json!({"type": "integer"}));
        let opts = ValidateOptions {
            format: MessageFormat::Custom(|invalid| invalid.code.as_str().to_string()),
            ..ValidateOptions::default()
        };
        let outcome = validate(&resolved, &json!("x"), &opts);
        assert_eq!(outcome.messages, vec!["type".to_string()]);
    }

    #[test]
    fn test_ensure_valid_round_trip() {
        let resolved = ResolvedSchema::inline(json!({"required": ["a"]}));
        assert!(ensure_valid(&resolved, &json!({"a": 1}), &ValidateOptions::default()).is_ok());
        let err = ensure_valid(&resolved, &json!({}), &ValidateOptions::default()).unwrap_err();
        assert!(err.to_string().contains("(required)"));
    }

    #[test]
    fn test_coerce_then_validate_mirror() {
        let resolved = ResolvedSchema::inline(json!({"type": "integer"}));
        let coerced = coerce(
            &resolved,
            json!("10"),
            &CoerceOptions {
                target: CoercionTarget::Query,
                ..CoerceOptions::default()
            },
        );
        assert_eq!(coerced, json!(10));
        assert!(validate(&resolved, &coerced, &ValidateOptions::default()).valid);
    }
}
