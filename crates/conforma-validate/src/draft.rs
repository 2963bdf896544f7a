//! # Dialects — Ordered Keyword Pipelines
//!
//! Each dialect is a static, ordered slice of keyword-validator function
//! pointers. Dispatch is a plain iteration over the slice — no runtime
//! reflection, and the cross-draft differences are explicit in the
//! tables below.
//!
//! Ordering is part of the contract: `$ref` runs first (legacy dialects
//! may stop the pipeline there), `unevaluatedProperties` and
//! `unevaluatedItems` run last so they observe every sibling keyword's
//! evaluation annotations.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::context::{Context, Validation};
use crate::keywords::{array, combinator, format, numeric, object, reference, string, types};

/// One keyword validator: inspects one or a few keywords of the schema
/// node and recurses into sub-schemas via the shared dispatcher.
pub type Keyword = fn(&Map<String, Value>, &Value, &Context<'_>) -> Validation;

/// The supported schema dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Draft {
    /// JSON Schema draft-4: `$ref` replaces the node, boolean-form
    /// `exclusiveMinimum`/`exclusiveMaximum`.
    Draft4,
    /// JSON Schema draft-6: adds `const`, `contains`, `propertyNames`,
    /// numeric-form exclusive bounds.
    Draft6,
    /// JSON Schema draft-7: `$ref` validates with siblings, adds
    /// `if`/`then`/`else`.
    Draft7,
    /// JSON Schema draft 2019-09: adds `dependentRequired`/
    /// `dependentSchemas`, `minContains`/`maxContains`, and the
    /// `unevaluated*` keywords.
    #[default]
    Draft201909,
    /// The OpenAPI 3 schema-object variant: `nullable`, strict tuple
    /// items, discriminator-directed `oneOf`.
    OpenApi3,
}

static DRAFT4: &[Keyword] = &[
    reference::ref_replaces_node,
    types::type_kind,
    types::enum_of,
    numeric::minimum,
    numeric::maximum,
    numeric::multiple_of,
    string::pattern,
    string::min_length,
    string::max_length,
    format::format,
    array::items,
    array::min_items,
    array::max_items,
    array::unique_items,
    object::properties,
    object::required,
    object::min_properties,
    object::max_properties,
    object::dependencies,
    combinator::all_of,
    combinator::any_of,
    combinator::one_of,
    combinator::not_schema,
];

static DRAFT6: &[Keyword] = &[
    reference::ref_replaces_node,
    types::type_kind,
    types::enum_of,
    types::const_of,
    numeric::minimum,
    numeric::maximum,
    numeric::exclusive_minimum,
    numeric::exclusive_maximum,
    numeric::multiple_of,
    string::pattern,
    string::min_length,
    string::max_length,
    format::format,
    array::items,
    array::min_items,
    array::max_items,
    array::unique_items,
    array::contains,
    object::properties,
    object::required,
    object::min_properties,
    object::max_properties,
    object::property_names,
    object::dependencies,
    combinator::all_of,
    combinator::any_of,
    combinator::one_of,
    combinator::not_schema,
];

static DRAFT7: &[Keyword] = &[
    reference::ref_with_siblings,
    types::type_kind,
    types::enum_of,
    types::const_of,
    numeric::minimum,
    numeric::maximum,
    numeric::exclusive_minimum,
    numeric::exclusive_maximum,
    numeric::multiple_of,
    string::pattern,
    string::min_length,
    string::max_length,
    format::format,
    array::items,
    array::min_items,
    array::max_items,
    array::unique_items,
    array::contains,
    object::properties,
    object::required,
    object::min_properties,
    object::max_properties,
    object::property_names,
    object::dependencies,
    combinator::if_then_else,
    combinator::all_of,
    combinator::any_of,
    combinator::one_of,
    combinator::not_schema,
];

static DRAFT201909: &[Keyword] = &[
    reference::ref_with_siblings,
    types::type_kind,
    types::enum_of,
    types::const_of,
    numeric::minimum,
    numeric::maximum,
    numeric::exclusive_minimum,
    numeric::exclusive_maximum,
    numeric::multiple_of,
    string::pattern,
    string::min_length,
    string::max_length,
    format::format,
    array::items,
    array::min_items,
    array::max_items,
    array::unique_items,
    array::contains_bounded,
    object::properties,
    object::required,
    object::min_properties,
    object::max_properties,
    object::property_names,
    object::dependent_required,
    object::dependent_schemas,
    combinator::if_then_else,
    combinator::all_of,
    combinator::any_of,
    combinator::one_of,
    combinator::not_schema,
    // Must run after every other keyword at the same node.
    combinator::unevaluated_properties,
    combinator::unevaluated_items,
];

static OPENAPI3: &[Keyword] = &[
    reference::ref_with_siblings,
    types::type_nullable,
    types::enum_of,
    numeric::minimum,
    numeric::maximum,
    numeric::multiple_of,
    string::pattern,
    string::min_length,
    string::max_length,
    format::format,
    array::items_strict,
    array::min_items,
    array::max_items,
    array::unique_items,
    object::properties,
    object::required,
    object::min_properties,
    object::max_properties,
    combinator::all_of,
    combinator::any_of,
    combinator::one_of_discriminator,
    combinator::not_schema,
];

impl Draft {
    /// The ordered keyword pipeline for this dialect.
    pub fn keywords(self) -> &'static [Keyword] {
        match self {
            Self::Draft4 => DRAFT4,
            Self::Draft6 => DRAFT6,
            Self::Draft7 => DRAFT7,
            Self::Draft201909 => DRAFT201909,
            Self::OpenApi3 => OPENAPI3,
        }
    }

    /// Whether `$ref` replaces the schema node entirely (draft ≤ 6).
    pub fn ref_replaces_node(self) -> bool {
        matches!(self, Self::Draft4 | Self::Draft6)
    }

    /// The dialect's conventional name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft4 => "draft4",
            Self::Draft6 => "draft6",
            Self::Draft7 => "draft7",
            Self::Draft201909 => "draft2019-09",
            Self::OpenApi3 => "openapi3",
        }
    }
}

impl fmt::Display for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown dialect name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown draft '{0}' (expected draft4, draft6, draft7, draft2019-09, or openapi3)")]
pub struct UnknownDraft(String);

impl FromStr for Draft {
    type Err = UnknownDraft;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft4" => Ok(Self::Draft4),
            "draft6" => Ok(Self::Draft6),
            "draft7" => Ok(Self::Draft7),
            "draft2019-09" | "draft2019" => Ok(Self::Draft201909),
            "openapi3" => Ok(Self::OpenApi3),
            other => Err(UnknownDraft(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unevaluated_keywords_run_last_in_2019() {
        let pipeline = Draft::Draft201909.keywords();
        let len = pipeline.len();
        assert_eq!(pipeline[len - 2] as usize, combinator::unevaluated_properties as usize);
        assert_eq!(pipeline[len - 1] as usize, combinator::unevaluated_items as usize);
    }

    #[test]
    fn test_ref_discipline_per_draft() {
        assert!(Draft::Draft4.ref_replaces_node());
        assert!(Draft::Draft6.ref_replaces_node());
        assert!(!Draft::Draft7.ref_replaces_node());
        assert!(!Draft::OpenApi3.ref_replaces_node());
    }

    #[test]
    fn test_draft_names_round_trip() {
        for draft in [
            Draft::Draft4,
            Draft::Draft6,
            Draft::Draft7,
            Draft::Draft201909,
            Draft::OpenApi3,
        ] {
            assert_eq!(draft.as_str().parse::<Draft>().unwrap(), draft);
        }
        assert!("draft5".parse::<Draft>().is_err());
    }
}
