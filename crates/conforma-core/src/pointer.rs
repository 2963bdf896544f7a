//! # JSON-Pointer Traversal (RFC 6901)
//!
//! Used by the resolver to chase `$ref` fragments into loaded documents.
//! Tokens unescape `~1` to `/` and `~0` to `~`, in that order.

use serde_json::Value;

/// Resolve an RFC 6901 pointer against a document.
///
/// The empty pointer denotes the document itself. A pointer that does not
/// start with `/`, or whose path does not exist, resolves to `None` —
/// missing targets are the caller's lenient-lookup problem, never a panic.
pub fn resolve_pointer<'v>(doc: &'v Value, pointer: &str) -> Option<&'v Value> {
    if pointer.is_empty() {
        return Some(doc);
    }
    if !pointer.starts_with('/') {
        return None;
    }
    let mut current = doc;
    for token in pointer.split('/').skip(1) {
        let token = unescape(token);
        current = match current {
            Value::Object(map) => map.get(&token)?,
            Value::Array(items) => {
                let index: usize = token.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Unescape one pointer token: `~1` → `/`, then `~0` → `~`.
fn unescape(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Escape a key for use as a pointer token: `~` → `~0`, then `/` → `~1`.
pub fn escape_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
