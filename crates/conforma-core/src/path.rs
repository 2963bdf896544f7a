//! # Instance Paths — Structured Error Locations
//!
//! The location of a failing value is a root name plus a vector of
//! key/index segments. Validators extend paths by value as they recurse;
//! the dotted/bracketed string form (`value.pets[0].name`) exists only in
//! `Display`, at the formatting boundary.

use std::fmt;

use serde::Serialize;

/// One step into an object property or an array element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Segment {
    /// Object property key.
    Key(String),
    /// Array element index.
    Index(usize),
}

/// Path from the validated root down to one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstancePath {
    root: String,
    segments: Vec<Segment>,
}

impl InstancePath {
    /// A path at the root, named by the caller (conventionally `"value"`).
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            segments: Vec::new(),
        }
    }

    /// The root name this path was created with.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The segments below the root.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// A copy of this path extended by one property key.
    pub fn push_key(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Key(key.to_string()));
        next
    }

    /// A copy of this path extended by one array index.
    pub fn push_index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Index(index));
        next
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_bare() {
        assert_eq!(InstancePath::new("value").to_string(), "value");
    }

    #[test]
    fn test_keys_and_indices_render_dotted_and_bracketed() {
        let path = InstancePath::new("value")
            .push_key("query")
            .push_key("pagination")
            .push_key("page");
        assert_eq!(path.to_string(), "value.query.pagination.page");

        let path = InstancePath::new("value").push_key("pets").push_index(0).push_key("name");
        assert_eq!(path.to_string(), "value.pets[0].name");
    }

    #[test]
    fn test_push_does_not_mutate_original() {
        let base = InstancePath::new("value").push_key("a");
        let _extended = base.push_key("b");
        assert_eq!(base.to_string(), "value.a");
    }
}
