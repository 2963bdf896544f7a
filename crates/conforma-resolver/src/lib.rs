//! # conforma-resolver — Reference Graph Resolution
//!
//! Builds a closed reference table from a root schema. Named locations
//! (`$id`/`$anchor`) are discovered first so that self-contained schemas
//! never touch the network; every remaining external reference is loaded
//! (local file or HTTP, JSON or YAML), walked the same way, and finally
//! every `$ref`/`$recursiveRef` in every document is rewritten to a
//! fully-qualified key into the shared table.
//!
//! ## Output
//!
//! [`ResolvedSchema`] — `{schema, refs, uris}`. The table is closed: each
//! `$ref` string reachable from the rewritten root or from any table value
//! is either a table key or a documented dangling no-op (the engine treats
//! an unresolvable reference as no constraint).
//!
//! ## I/O Model
//!
//! Resolution is the only part of the engine that performs I/O. Fetches
//! are awaited one at a time; a loaded-URI set guards against refetching
//! and against mutually-referencing document cycles. The root document
//! failing to load aborts the whole resolve — there is no partial result.

pub mod error;
pub mod loader;
pub mod resolver;

pub use error::ResolveError;
pub use resolver::{compile, compile_file, Resolver};

// Re-exported so engine callers need only this crate plus serde_json.
pub use conforma_core::{RefTable, ResolvedSchema};
