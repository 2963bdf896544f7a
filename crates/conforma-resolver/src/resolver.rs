//! # Reference Resolution — From Root Schema to Closed Table
//!
//! Four stages, in a fixed order:
//!
//! 1. **Named-ref extraction.** Walk the root tracking the base `$id`
//!    (each node's `$id` is joined against its parent's base as a URL).
//!    Nodes carrying `$id`/`$anchor` are recorded by canonical key before
//!    anything is fetched, so self-contained schemas never touch the
//!    network or the filesystem.
//! 2. **External URL extraction.** Collect the pre-`#` part of every
//!    `$ref`/`$recursiveRef`, joined against the current base, skipping
//!    anything already satisfied by a named location.
//! 3. **Fetch loop.** A worklist of undiscovered URLs; each loaded
//!    document goes through stages 1–2 itself. The loaded-URI set stops
//!    refetching and breaks document cycles.
//! 4. **Rewriting.** Depth-first over every document (and the root),
//!    each `$ref` becomes its fully-qualified table key; `$recursiveRef`
//!    is flattened to a static `$ref` when the target carries
//!    `$recursiveAnchor: true`. Rewriting is idempotent.
//!
//! The source model shares live nodes between documents and the table, so
//! rewriting a document rewrote the table in place. This port instead
//! rewrites every document first and only then extracts table subtrees,
//! which gives the same closed table without aliasing.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use serde_json::{Map, Value};

use conforma_core::pointer::{escape_token, resolve_pointer};
use conforma_core::{RefTable, ResolvedSchema};

use crate::error::ResolveError;
use crate::loader::DocumentLoader;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolve an inline schema with the default resolver.
pub async fn compile(schema: &Value) -> Result<ResolvedSchema, ResolveError> {
    Resolver::new().resolve(schema, None).await
}

/// Load and resolve a root schema document with the default resolver.
pub async fn compile_file(uri: &str) -> Result<ResolvedSchema, ResolveError> {
    Resolver::new().resolve_file(uri).await
}

/// Builds [`ResolvedSchema`] values from root schemas.
#[derive(Debug, Clone)]
pub struct Resolver {
    timeout: Duration,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl Resolver {
    /// A resolver with the default fetch timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the per-request fetch timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve an inline schema. `file_context` is the location the
    /// schema was read from, used as the base for relative references.
    ///
    /// The input is deep-cloned; the caller's value is never mutated.
    pub async fn resolve(
        &self,
        schema: &Value,
        file_context: Option<&str>,
    ) -> Result<ResolvedSchema, ResolveError> {
        let base = file_context.unwrap_or("").to_string();
        self.resolve_inner(schema.clone(), base).await
    }

    /// Load the root document at `uri` and resolve it with `uri` as the
    /// base for relative references.
    ///
    /// # Errors
    ///
    /// [`ResolveError::RootLoad`] when the root document itself cannot be
    /// loaded — there is no partial resolution result.
    pub async fn resolve_file(&self, uri: &str) -> Result<ResolvedSchema, ResolveError> {
        let loader = DocumentLoader::new(self.timeout)?;
        let root = loader.load(uri).await.map_err(|e| match e {
            ResolveError::FileNotFound { .. }
            | ResolveError::Fetch { .. }
            | ResolveError::Parse { .. } => ResolveError::RootLoad {
                uri: uri.to_string(),
                reason: e.to_string(),
            },
            other => other,
        })?;
        self.resolve_inner(root, uri.to_string()).await
    }

    async fn resolve_inner(
        &self,
        root: Value,
        base: String,
    ) -> Result<ResolvedSchema, ResolveError> {
        let loader = DocumentLoader::new(self.timeout)?;

        let mut docs: Vec<Document> = vec![Document {
            url: base.clone(),
            base: base.clone(),
            value: root,
        }];
        let mut by_url: HashMap<String, usize> = HashMap::new();
        if !base.is_empty() {
            by_url.insert(base.clone(), 0);
        }
        register_document_id(&docs[0].value, &base, 0, &mut by_url);

        let mut named: HashMap<String, Location> = HashMap::new();
        collect_named(0, &docs[0].value, &base, "", &mut named);

        let mut queue: VecDeque<String> = VecDeque::new();
        let mut found = Vec::new();
        collect_external(&docs[0].value, &base, &named, &mut found);
        queue.extend(found);

        let mut uris: Vec<String> = Vec::new();
        while let Some(uri) = queue.pop_front() {
            if by_url.contains_key(&uri) || named.contains_key(&uri) {
                continue;
            }
            let value = loader.load(&uri).await?;
            tracing::debug!(uri = %uri, "loaded external schema document");
            uris.push(uri.clone());
            let idx = docs.len();
            by_url.insert(uri.clone(), idx);
            register_document_id(&value, &uri, idx, &mut by_url);
            collect_named(idx, &value, &uri, "", &mut named);
            let mut found = Vec::new();
            collect_external(&value, &uri, &named, &mut found);
            queue.extend(found);
            docs.push(Document {
                url: uri.clone(),
                base: uri,
                value,
            });
        }

        // Rewrite every document against a pristine snapshot so pointer
        // existence checks see the trees as loaded.
        let raw: Vec<Value> = docs.iter().map(|d| d.value.clone()).collect();
        let bases: Vec<String> = docs.iter().map(|d| d.base.clone()).collect();
        let lookup = Lookup {
            by_url: &by_url,
            named: &named,
            raw: &raw,
            bases: &bases,
        };
        let mut pending: Vec<(String, Location)> = Vec::new();
        for i in 0..docs.len() {
            let doc_base = docs[i].base.clone();
            let mut value = std::mem::take(&mut docs[i].value);
            rewrite_refs(&mut value, &doc_base, i, &lookup, &mut pending);
            docs[i].value = value;
        }

        // Assemble the table from the rewritten documents: whole loaded
        // documents under their URL keys, then named locations, then
        // pointer targets discovered during rewriting.
        let mut refs = RefTable::new();
        for doc in docs.iter().skip(1) {
            refs.insert(doc.url.clone(), doc.value.clone());
        }
        if !docs[0].url.is_empty() {
            refs.insert(docs[0].url.clone(), docs[0].value.clone());
        }
        for (key, location) in &named {
            if let Some(sub) = resolve_pointer(&docs[location.doc].value, &location.pointer) {
                refs.insert(key.clone(), sub.clone());
            }
        }
        for (key, location) in pending {
            if let Some(sub) = resolve_pointer(&docs[location.doc].value, &location.pointer) {
                refs.insert(key, sub.clone());
            }
        }

        let root = docs.swap_remove(0).value;
        Ok(ResolvedSchema {
            schema: root,
            refs,
            uris,
        })
    }
}

/// Where a table value lives before extraction: a document index plus a
/// JSON pointer into it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Location {
    doc: usize,
    pointer: String,
}

struct Document {
    url: String,
    base: String,
    value: Value,
}

struct Lookup<'a> {
    by_url: &'a HashMap<String, usize>,
    named: &'a HashMap<String, Location>,
    raw: &'a [Value],
    bases: &'a [String],
}

// Keywords whose contents are data, not schemas. References inside them
// must survive untouched.
fn is_literal_keyword(key: &str) -> bool {
    matches!(key, "enum" | "const" | "default" | "examples")
}

/// The base URI in effect at a node: its own `$id` joined against the
/// parent base, or the parent base unchanged.
fn node_base(map: &Map<String, Value>, base: &str) -> String {
    match map.get("$id").and_then(Value::as_str) {
        Some(id) => join_uri(base, id).unwrap_or_else(|| base.to_string()),
        None => base.to_string(),
    }
}

/// Join a reference against a base.
///
/// Absolute URIs are kept verbatim (no trailing-slash normalization, so
/// that `$id: "http://host:1234"` and references to it agree on the key
/// string). Relative references join against a URL base via the `url`
/// crate, or against a filesystem-style base by replacing the final path
/// component. `None` means the link is malformed and must be skipped.
fn join_uri(base: &str, reference: &str) -> Option<String> {
    if reference.is_empty() {
        return Some(base.to_string());
    }
    if url::Url::parse(reference).is_ok() {
        return Some(reference.to_string());
    }
    if base.is_empty() {
        return Some(reference.to_string());
    }
    if let Ok(base_url) = url::Url::parse(base) {
        return base_url.join(reference).ok().map(String::from);
    }
    match base.rfind('/') {
        Some(pos) => Some(format!("{}/{}", &base[..pos], reference)),
        None => Some(reference.to_string()),
    }
}

fn split_ref(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once('#') {
        Some((url_part, fragment)) => (url_part, Some(fragment)),
        None => (reference, None),
    }
}

fn register_document_id(
    value: &Value,
    base: &str,
    idx: usize,
    by_url: &mut HashMap<String, usize>,
) {
    if let Some(id) = value.as_object().and_then(|m| m.get("$id")).and_then(Value::as_str) {
        if let Some(abs) = join_uri(base, id) {
            by_url.entry(abs).or_insert(idx);
        }
    }
}

/// Stage 1: record every `$id`/`$anchor` location by canonical key.
fn collect_named(
    idx: usize,
    value: &Value,
    base: &str,
    pointer: &str,
    named: &mut HashMap<String, Location>,
) {
    match value {
        Value::Object(map) => {
            let node_base = node_base(map, base);
            if map.get("$id").and_then(Value::as_str).is_some() && !node_base.is_empty() {
                named.entry(node_base.clone()).or_insert_with(|| Location {
                    doc: idx,
                    pointer: pointer.to_string(),
                });
            }
            if let Some(anchor) = map.get("$anchor").and_then(Value::as_str) {
                named
                    .entry(format!("{node_base}#{anchor}"))
                    .or_insert_with(|| Location {
                        doc: idx,
                        pointer: pointer.to_string(),
                    });
            }
            for (key, child) in map {
                if is_literal_keyword(key) {
                    continue;
                }
                let child_pointer = format!("{pointer}/{}", escape_token(key));
                collect_named(idx, child, &node_base, &child_pointer, named);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                let child_pointer = format!("{pointer}/{i}");
                collect_named(idx, child, base, &child_pointer, named);
            }
        }
        _ => {}
    }
}

/// Stage 2: collect external document URLs that are not already covered
/// by a named location.
fn collect_external(
    value: &Value,
    base: &str,
    named: &HashMap<String, Location>,
    out: &mut Vec<String>,
) {
    match value {
        Value::Object(map) => {
            let node_base = node_base(map, base);
            for ref_keyword in ["$ref", "$recursiveRef"] {
                if let Some(reference) = map.get(ref_keyword).and_then(Value::as_str) {
                    let (url_part, fragment) = split_ref(reference);
                    if url_part.is_empty() {
                        continue;
                    }
                    match join_uri(&node_base, url_part) {
                        Some(resolved) => {
                            let full = match fragment {
                                Some(f) => format!("{resolved}#{f}"),
                                None => resolved.clone(),
                            };
                            if !named.contains_key(&resolved) && !named.contains_key(&full) {
                                out.push(resolved);
                            }
                        }
                        None => {
                            tracing::warn!(reference, "skipping malformed reference URL");
                        }
                    }
                }
            }
            for (key, child) in map {
                if is_literal_keyword(key) {
                    continue;
                }
                collect_external(child, &node_base, named, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_external(child, base, named, out);
            }
        }
        _ => {}
    }
}

/// Stage 4: rewrite every reference in a document to its canonical key.
fn rewrite_refs(
    node: &mut Value,
    base: &str,
    cur_idx: usize,
    lookup: &Lookup<'_>,
    pending: &mut Vec<(String, Location)>,
) {
    match node {
        Value::Object(map) => {
            let node_base = node_base(map, base);
            if map.contains_key("$recursiveRef") {
                rewrite_recursive_ref(map, &node_base, cur_idx, lookup, pending);
            }
            if map.contains_key("$ref") {
                rewrite_plain_ref(map, &node_base, cur_idx, lookup, pending);
            }
            for (key, child) in map.iter_mut() {
                if is_literal_keyword(key) {
                    continue;
                }
                rewrite_refs(child, &node_base, cur_idx, lookup, pending);
            }
        }
        Value::Array(items) => {
            for child in items {
                rewrite_refs(child, base, cur_idx, lookup, pending);
            }
        }
        _ => {}
    }
}

fn rewrite_plain_ref(
    map: &mut Map<String, Value>,
    node_base: &str,
    cur_idx: usize,
    lookup: &Lookup<'_>,
    pending: &mut Vec<(String, Location)>,
) {
    let Some(reference) = map.get("$ref").and_then(Value::as_str).map(str::to_string) else {
        return;
    };
    let Some((full_key, target)) = qualify(&reference, node_base, cur_idx, lookup) else {
        tracing::warn!(reference = %reference, "skipping malformed reference URL");
        return;
    };
    if let Some(location) = target {
        pending.push((full_key.clone(), location));
    }
    map.insert("$ref".to_string(), Value::String(full_key));
}

fn rewrite_recursive_ref(
    map: &mut Map<String, Value>,
    node_base: &str,
    cur_idx: usize,
    lookup: &Lookup<'_>,
    pending: &mut Vec<(String, Location)>,
) {
    let Some(reference) = map
        .get("$recursiveRef")
        .and_then(Value::as_str)
        .map(str::to_string)
    else {
        return;
    };
    let (url_part, fragment) = split_ref(&reference);
    let pointer = fragment.unwrap_or("");

    let resolved_url = if url_part.is_empty() {
        Some(node_base.to_string())
    } else {
        join_uri(node_base, url_part)
    };

    let anchored_target = resolved_url.as_ref().and_then(|u| {
        let idx = *lookup.by_url.get(u)?;
        let target = resolve_pointer(&lookup.raw[idx], pointer)?;
        let anchored = target
            .get("$recursiveAnchor")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        anchored.then_some((idx, target))
    });

    if let Some((idx, target)) = anchored_target {
        // Dynamic recursion flattened to static indirection: the target
        // is registered under its own `$id` plus the pointer, and this
        // node carries an ordinary $ref to it.
        let target_id = target
            .get("$id")
            .and_then(Value::as_str)
            .and_then(|id| join_uri(&lookup.bases[idx], id))
            .or_else(|| resolved_url.clone())
            .unwrap_or_default();
        let key = format!("{target_id}#{pointer}");
        pending.push((
            key.clone(),
            Location {
                doc: idx,
                pointer: pointer.to_string(),
            },
        ));
        map.remove("$recursiveRef");
        map.insert("$ref".to_string(), Value::String(key));
        return;
    }

    // No $recursiveAnchor at the target: behaves as an ordinary $ref.
    if let Some((full_key, target)) = qualify(&reference, node_base, cur_idx, lookup) {
        if let Some(location) = target {
            pending.push((full_key.clone(), location));
        }
        map.remove("$recursiveRef");
        map.insert("$ref".to_string(), Value::String(full_key));
    }
}

/// Compute the canonical key for a reference and, when the target exists,
/// where its value can be extracted from after rewriting.
///
/// `None` means the URL part is malformed and the link must be skipped.
/// `Some((key, None))` is a dangling reference: the key is canonical but
/// nothing will be stored under it, and validation treats it as no
/// constraint.
fn qualify(
    reference: &str,
    node_base: &str,
    cur_idx: usize,
    lookup: &Lookup<'_>,
) -> Option<(String, Option<Location>)> {
    let (url_part, fragment) = split_ref(reference);
    let resolved_url = if url_part.is_empty() {
        node_base.to_string()
    } else {
        join_uri(node_base, url_part)?
    };
    let full_key = match fragment {
        Some(f) => format!("{resolved_url}#{f}"),
        None => resolved_url.clone(),
    };

    // Satisfied by a named location or by a loaded document.
    if lookup.named.contains_key(&full_key) || lookup.by_url.contains_key(&full_key) {
        return Some((full_key, None));
    }

    // Pointer fragments traverse the target schema resource, which may be
    // a whole document or a node that declared the base via an embedded
    // `$id` (the pointer is then relative to that node).
    if let Some(f) = fragment {
        if f.is_empty() || f.starts_with('/') {
            let resource = if let Some(&idx) = lookup.by_url.get(&resolved_url) {
                Some((idx, String::new()))
            } else if let Some(location) = lookup.named.get(&resolved_url) {
                Some((location.doc, location.pointer.clone()))
            } else if url_part.is_empty() {
                Some((cur_idx, String::new()))
            } else {
                None
            };
            if let Some((idx, prefix)) = resource {
                let doc_pointer = format!("{prefix}{f}");
                if resolve_pointer(&lookup.raw[idx], &doc_pointer).is_some() {
                    return Some((
                        full_key,
                        Some(Location {
                            doc: idx,
                            pointer: doc_pointer,
                        }),
                    ));
                }
            }
        }
    }

    tracing::debug!(reference, key = %full_key, "reference target not found; left dangling");
    Some((full_key, None))
}
