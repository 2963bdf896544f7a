//! # Invalid Records — Validation Failures as Data
//!
//! A failed keyword produces an [`Invalid`] record: the closed
//! [`ErrorCode`] naming the keyword, the [`InstancePath`] to the failing
//! value, and an [`InvalidDetail`] with the keyword-specific context (the
//! limit violated, the missing keys, or — for `oneOf`/`anyOf` — the full
//! per-branch error lists that nested formatting needs).
//!
//! Records are accumulated and returned, never thrown.

use serde::Serialize;
use serde_json::{Number, Value};

use crate::path::InstancePath;

/// Which keyword failed. One variant per keyword in the supported
/// dialects, plus [`ErrorCode::False`] for the literal `false` schema.
///
/// `const` failures are reported as [`ErrorCode::Enum`]: the engine
/// defines `const` as `enum` with a single literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    Type,
    Enum,
    Required,
    Pattern,
    MinLength,
    MaxLength,
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MultipleOf,
    Format,
    Items,
    AdditionalItems,
    MinItems,
    MaxItems,
    UniqueItems,
    Contains,
    MinContains,
    MaxContains,
    AdditionalProperties,
    UnevaluatedProperties,
    UnevaluatedItems,
    MinProperties,
    MaxProperties,
    PropertyNames,
    Dependencies,
    DependentRequired,
    Ref,
    OneOf,
    AnyOf,
    Not,
    False,
}

impl ErrorCode {
    /// The keyword spelling used in rendered messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Enum => "enum",
            Self::Required => "required",
            Self::Pattern => "pattern",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::ExclusiveMinimum => "exclusiveMinimum",
            Self::ExclusiveMaximum => "exclusiveMaximum",
            Self::MultipleOf => "multipleOf",
            Self::Format => "format",
            Self::Items => "items",
            Self::AdditionalItems => "additionalItems",
            Self::MinItems => "minItems",
            Self::MaxItems => "maxItems",
            Self::UniqueItems => "uniqueItems",
            Self::Contains => "contains",
            Self::MinContains => "minContains",
            Self::MaxContains => "maxContains",
            Self::AdditionalProperties => "additionalProperties",
            Self::UnevaluatedProperties => "unevaluatedProperties",
            Self::UnevaluatedItems => "unevaluatedItems",
            Self::MinProperties => "minProperties",
            Self::MaxProperties => "maxProperties",
            Self::PropertyNames => "propertyNames",
            Self::Dependencies => "dependencies",
            Self::DependentRequired => "dependentRequired",
            Self::Ref => "ref",
            Self::OneOf => "oneOf",
            Self::AnyOf => "anyOf",
            Self::Not => "not",
            Self::False => "false",
        }
    }
}

/// Keyword-specific context attached to an [`Invalid`] record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InvalidDetail {
    /// No extra context.
    None,
    /// A numeric limit that was violated (bounds, lengths, counts).
    Limit(Number),
    /// The type names the value was required to have.
    Types(Vec<String>),
    /// The literals the value was required to equal one of.
    Allowed(Vec<Value>),
    /// The regular expression the value was required to match.
    Pattern(String),
    /// The named format the value was required to satisfy.
    Format(String),
    /// Property keys: missing for `required`, offending for
    /// `additionalProperties`/`unevaluatedProperties`/`propertyNames`.
    Keys(Vec<String>),
    /// A property whose presence requires other properties.
    Dependency {
        /// The property that triggered the dependency.
        on: String,
        /// The properties it requires that were missing.
        missing: Vec<String>,
    },
    /// Per-branch error lists for `anyOf`/`oneOf` nested rendering.
    Branches(Vec<Vec<Invalid>>),
}

/// One validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invalid {
    /// The keyword that failed.
    pub code: ErrorCode,
    /// Path to the failing value.
    pub path: InstancePath,
    /// Keyword-specific context.
    pub detail: InvalidDetail,
}

impl Invalid {
    /// Construct a record.
    pub fn new(code: ErrorCode, path: InstancePath, detail: InvalidDetail) -> Self {
        Self { code, path, detail }
    }
}
