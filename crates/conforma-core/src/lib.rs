//! # conforma-core — Foundational Types for the Conforma Engine
//!
//! This crate is the leaf of the conforma workspace DAG. It defines the
//! value algebra and record types shared by the resolver and the
//! validation/coercion engine; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Structural equality, not representational.** `deep_equal` compares
//!    JSON values by meaning: `1` and `1.0` are the same number even though
//!    `serde_json` stores them differently. `enum`, `const`, and
//!    `uniqueItems` all flow through this one definition.
//!
//! 2. **Structured instance paths.** The path to a failing value is a
//!    vector of key/index segments ([`InstancePath`]), rendered to the
//!    `value.query.pagination.page` form only at the formatting boundary.
//!    No string concatenation during validation.
//!
//! 3. **Errors are data.** A validation failure is an [`Invalid`] record
//!    with a closed [`ErrorCode`] and keyword-specific [`InvalidDetail`],
//!    never an exception. Callers can always distinguish "the value does
//!    not conform" from "the engine could not run".
//!
//! 4. **Cycles are broken by indirection.** A [`ResolvedSchema`] carries a
//!    string-keyed reference table; `$ref` values are table keys, never
//!    live pointers, which is what makes self-referential schemas safe to
//!    share across threads.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `conforma-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod invalid;
pub mod path;
pub mod pointer;
pub mod resolved;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use invalid::{ErrorCode, Invalid, InvalidDetail};
pub use path::{InstancePath, Segment};
pub use pointer::{escape_token, resolve_pointer};
pub use resolved::{RefTable, ResolvedSchema};
pub use value::{deep_equal, is_integer, kind_name, matches_type, unique};
