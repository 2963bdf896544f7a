//! # Validation Context and Result Accumulation
//!
//! A [`Context`] is created fresh per top-level validate call and passed
//! by value down the recursion — copied, never shared — so concurrent
//! validation calls against one [`ResolvedSchema`](conforma_core::ResolvedSchema)
//! need no locking.
//!
//! The two evaluated sets are scoped to one object/array level: they are
//! reset when descending into a child value and preserved when
//! re-validating the same value (combinator branches, `$ref` targets).
//! `unevaluatedProperties`/`unevaluatedItems` read them; every other
//! keyword only writes.

use std::collections::BTreeSet;

use conforma_core::{InstancePath, Invalid, RefTable};

use crate::draft::Draft;

/// Reference recursion bound. A table whose entries form a ref cycle with
/// no base case is a caller error; this guard turns it into a single
/// `ref`-coded validation error instead of a stack overflow.
pub(crate) const MAX_REF_DEPTH: u32 = 128;

/// Per-call validation state, copied on every recursive descent.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    /// Path to the value currently being validated.
    pub path: InstancePath,
    /// The active dialect; selects the keyword pipeline.
    pub draft: Draft,
    /// The shared reference table from resolution.
    pub refs: &'a RefTable,
    /// Property keys already satisfied by sibling keywords at this
    /// object level.
    pub evaluated_properties: BTreeSet<String>,
    /// Array indices already satisfied by sibling keywords at this
    /// array level.
    pub evaluated_items: BTreeSet<usize>,
    /// `$ref` chain depth, bounded by [`MAX_REF_DEPTH`].
    pub(crate) ref_depth: u32,
}

impl<'a> Context<'a> {
    /// A fresh context rooted at `name` (conventionally `"value"`).
    pub fn new(name: &str, draft: Draft, refs: &'a RefTable) -> Self {
        Self {
            path: InstancePath::new(name),
            draft,
            refs,
            evaluated_properties: BTreeSet::new(),
            evaluated_items: BTreeSet::new(),
            ref_depth: 0,
        }
    }

    /// Context for a property value: path extended, evaluated sets reset
    /// (they describe the child's own object/array level). The ref-depth
    /// guard also resets: descending into data is progress, only a ref
    /// chain that never touches the value can cycle.
    pub fn for_key(&self, key: &str) -> Self {
        let mut child = self.clone();
        child.path = self.path.push_key(key);
        child.evaluated_properties = BTreeSet::new();
        child.evaluated_items = BTreeSet::new();
        child.ref_depth = 0;
        child
    }

    /// Context for an array element: path extended, evaluated sets reset.
    pub fn for_index(&self, index: usize) -> Self {
        let mut child = self.clone();
        child.path = self.path.push_index(index);
        child.evaluated_properties = BTreeSet::new();
        child.evaluated_items = BTreeSet::new();
        child.ref_depth = 0;
        child
    }

    /// Context for re-validating the same value (combinator branches,
    /// conditionals, `$ref` targets): everything carried over.
    pub fn for_branch(&self) -> Self {
        self.clone()
    }
}

/// The result of validating one value against one schema node.
#[derive(Debug, Clone, Default)]
pub struct Validation {
    /// Accumulated failures, in keyword-pipeline order.
    pub errors: Vec<Invalid>,
    /// Legacy-dialect signal: a `$ref` was followed and sibling keywords
    /// at this node must not also be validated.
    pub skip_rest: bool,
    /// Property keys this node's keywords evaluated.
    pub evaluated_properties: BTreeSet<String>,
    /// Array indices this node's keywords evaluated.
    pub evaluated_items: BTreeSet<usize>,
}

impl Validation {
    /// A clean result.
    pub fn ok() -> Self {
        Self::default()
    }

    /// A result carrying a single failure.
    pub fn fail(invalid: Invalid) -> Self {
        Self {
            errors: vec![invalid],
            ..Self::default()
        }
    }

    /// Whether this result carries no failures.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Concatenate errors and union evaluated sets.
    pub fn merge(&mut self, other: Validation) {
        self.errors.extend(other.errors);
        self.evaluated_properties.extend(other.evaluated_properties);
        self.evaluated_items.extend(other.evaluated_items);
    }
}
