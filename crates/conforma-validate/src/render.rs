//! # Error Rendering
//!
//! One line per record: `[<path>] (<code>) <explanation>`, with
//! `anyOf`/`oneOf` branch traces nested underneath, two-space indented
//! and prefixed `Schema N:`.

use conforma_core::{ErrorCode, Invalid, InvalidDetail};

/// How validation errors are surfaced by the public API.
#[derive(Debug, Clone, Copy, Default)]
pub enum MessageFormat {
    /// Raw [`Invalid`] records only, no strings.
    Raw,
    /// The engine's standard rendering.
    #[default]
    Human,
    /// A caller-provided renderer applied to each record.
    Custom(fn(&Invalid) -> String),
}

/// Render one record, including nested branch traces.
pub fn render(invalid: &Invalid) -> String {
    let mut out = String::new();
    render_into(&mut out, invalid, 0);
    out
}

/// Render every record in order.
pub fn render_all(errors: &[Invalid]) -> Vec<String> {
    errors.iter().map(render).collect()
}

fn render_into(out: &mut String, invalid: &Invalid, indent: usize) {
    let pad = "  ".repeat(indent);
    out.push_str(&format!(
        "{pad}[{}] ({}) {}",
        invalid.path,
        invalid.code.as_str(),
        explanation(invalid)
    ));
    if let InvalidDetail::Branches(branches) = &invalid.detail {
        for (i, branch) in branches.iter().enumerate() {
            out.push('\n');
            out.push_str(&format!("{pad}  Schema {}:", i + 1));
            for inner in branch {
                out.push('\n');
                render_into(out, inner, indent + 2);
            }
        }
    }
}

fn explanation(invalid: &Invalid) -> String {
    match (&invalid.code, &invalid.detail) {
        (ErrorCode::Type, InvalidDetail::Types(names)) => {
            let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
            format!("should be of type {}", quoted.join(" or "))
        }
        (ErrorCode::Enum, InvalidDetail::Allowed(literals)) => {
            let rendered: Vec<String> = literals.iter().map(ToString::to_string).collect();
            format!("should be one of [{}]", rendered.join(", "))
        }
        (ErrorCode::Required, InvalidDetail::Keys(keys)) => {
            format!("is missing required properties: {}", keys.join(", "))
        }
        (ErrorCode::Pattern, InvalidDetail::Pattern(pattern)) => {
            format!("should match /{pattern}/")
        }
        (ErrorCode::Format, InvalidDetail::Format(name)) => {
            format!("should match format '{name}'")
        }
        (ErrorCode::Minimum, InvalidDetail::Limit(n)) => format!("should be at least {n}"),
        (ErrorCode::Maximum, InvalidDetail::Limit(n)) => format!("should be at most {n}"),
        (ErrorCode::ExclusiveMinimum, InvalidDetail::Limit(n)) => {
            format!("should be greater than {n}")
        }
        (ErrorCode::ExclusiveMaximum, InvalidDetail::Limit(n)) => {
            format!("should be less than {n}")
        }
        (ErrorCode::MultipleOf, InvalidDetail::Limit(n)) => {
            format!("should be a multiple of {n}")
        }
        (ErrorCode::MinLength, InvalidDetail::Limit(n)) => {
            format!("should have at least {n} characters")
        }
        (ErrorCode::MaxLength, InvalidDetail::Limit(n)) => {
            format!("should have at most {n} characters")
        }
        (ErrorCode::MinItems, InvalidDetail::Limit(n)) => {
            format!("should have at least {n} items")
        }
        (ErrorCode::MaxItems, InvalidDetail::Limit(n)) => {
            format!("should have at most {n} items")
        }
        (ErrorCode::AdditionalItems, InvalidDetail::Limit(n)) => {
            format!("should not have more than {n} items")
        }
        (ErrorCode::UniqueItems, _) => "should not contain duplicate items".to_string(),
        (ErrorCode::Contains, _) => "should contain a matching item".to_string(),
        (ErrorCode::MinContains, InvalidDetail::Limit(n)) => {
            format!("should contain at least {n} matching items")
        }
        (ErrorCode::MaxContains, InvalidDetail::Limit(n)) => {
            format!("should contain at most {n} matching items")
        }
        (ErrorCode::AdditionalProperties, InvalidDetail::Keys(keys)) => {
            format!("has unexpected properties: {}", keys.join(", "))
        }
        (ErrorCode::UnevaluatedProperties, InvalidDetail::Keys(keys)) => {
            format!("has unevaluated properties: {}", keys.join(", "))
        }
        (ErrorCode::UnevaluatedItems, _) => "has unevaluated items".to_string(),
        (ErrorCode::MinProperties, InvalidDetail::Limit(n)) => {
            format!("should have at least {n} properties")
        }
        (ErrorCode::MaxProperties, InvalidDetail::Limit(n)) => {
            format!("should have at most {n} properties")
        }
        (ErrorCode::PropertyNames, InvalidDetail::Keys(keys)) => {
            format!("has invalid property names: {}", keys.join(", "))
        }
        (
            ErrorCode::Dependencies | ErrorCode::DependentRequired,
            InvalidDetail::Dependency { on, missing },
        ) => {
            format!("property '{on}' requires properties: {}", missing.join(", "))
        }
        (ErrorCode::OneOf, _) => "should match exactly one schema:".to_string(),
        (ErrorCode::AnyOf, _) => "should match at least one schema:".to_string(),
        (ErrorCode::Not, _) => "should not match the schema".to_string(),
        (ErrorCode::Ref, _) => "reference recursion limit exceeded".to_string(),
        (ErrorCode::False, _) => "is never valid".to_string(),
        (code, _) => format!("violates '{}'", code.as_str()),
    }
}
