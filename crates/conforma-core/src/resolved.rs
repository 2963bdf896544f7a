//! # Resolved Schemas — The Shared Reference Table
//!
//! The resolver's output: the rewritten root schema, the canonical-key
//! reference table, and the set of external documents that were loaded.
//! Built once per root schema, then treated as read-only context by any
//! number of concurrent validation and coercion calls.

use std::collections::HashMap;

use serde_json::Value;

/// Canonical key (`absolute-URI` or `absolute-URI#pointer-or-anchor`) to
/// schema. Every `$ref` appearing in a resolved schema is either a key in
/// this table or a documented dangling no-op.
pub type RefTable = HashMap<String, Value>;

/// A root schema with its closed reference table.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSchema {
    /// The rewritten root schema; every `$ref` in it is a canonical key.
    pub schema: Value,
    /// Canonical key → schema for every named or loaded location.
    pub refs: RefTable,
    /// External document URIs that were fetched during resolution.
    pub uris: Vec<String>,
}

impl ResolvedSchema {
    /// A resolved schema with no external references — the common case
    /// for self-contained inline schemas.
    pub fn inline(schema: Value) -> Self {
        Self {
            schema,
            refs: RefTable::new(),
            uris: Vec::new(),
        }
    }

    /// Look up a canonical key. A missing key is not an error: the engine
    /// treats a dangling `$ref` as no constraint.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        self.refs.get(key)
    }
}
