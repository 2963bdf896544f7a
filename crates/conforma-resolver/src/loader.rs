//! # Document Loading — Bytes for a URI
//!
//! Loads external schema documents from the local filesystem or over
//! HTTP(S). The encoding is chosen by file extension (`.yaml`/`.yml` is
//! YAML, everything else JSON); HTTP responses with no usable extension
//! are tried as JSON first and as YAML second, since every JSON document
//! is also valid YAML but not vice versa.

use std::path::Path;
use std::time::Duration;

use serde_json::Value;

use crate::error::ResolveError;

/// Loads schema documents for the resolver's fetch loop.
pub struct DocumentLoader {
    client: reqwest::Client,
}

impl DocumentLoader {
    /// Build a loader whose HTTP requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Load and parse the document at `uri`.
    ///
    /// `http://`/`https://` URIs are fetched over the network; anything
    /// else is treated as a filesystem path.
    ///
    /// # Errors
    ///
    /// [`ResolveError::FileNotFound`] when a local path does not exist
    /// (naming the file and the directory searched),
    /// [`ResolveError::Fetch`] on transport failures, and
    /// [`ResolveError::Parse`] when the bytes are neither valid JSON nor
    /// valid YAML.
    pub async fn load(&self, uri: &str) -> Result<Value, ResolveError> {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            self.load_http(uri).await
        } else {
            load_file(uri)
        }
    }

    async fn load_http(&self, uri: &str) -> Result<Value, ResolveError> {
        tracing::debug!(uri, "fetching external schema document");
        let response = self
            .client
            .get(uri)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ResolveError::Fetch {
                uri: uri.to_string(),
                reason: e.to_string(),
            })?;
        let text = response.text().await.map_err(|e| ResolveError::Fetch {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;
        parse_document(uri, &text)
    }
}

fn load_file(uri: &str) -> Result<Value, ResolveError> {
    let path = Path::new(uri);
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ".".to_string());
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| uri.to_string());
            return Err(ResolveError::FileNotFound { file, directory });
        }
        Err(e) => return Err(ResolveError::Io(e)),
    };
    parse_document(uri, &text)
}

/// Parse document text as JSON or YAML according to the URI's extension.
pub fn parse_document(uri: &str, text: &str) -> Result<Value, ResolveError> {
    let lower = uri.to_ascii_lowercase();
    if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        return parse_yaml(uri, text);
    }
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        // HTTP documents are not required to advertise an extension.
        Err(_) => parse_yaml(uri, text),
    }
}

fn parse_yaml(uri: &str, text: &str) -> Result<Value, ResolveError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| ResolveError::Parse {
            uri: uri.to_string(),
            reason: format!("invalid YAML: {e}"),
        })?;
    yaml_to_json(&yaml).map_err(|reason| ResolveError::Parse {
        uri: uri.to_string(),
        reason,
    })
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Schema documents use only the JSON-compatible subset of YAML; tags are
/// ignored and non-string map keys are stringified.
fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                json_map.insert(key, yaml_to_json(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_by_default() {
        let value = parse_document("schema.json", r#"{"type": "string"}"#).unwrap();
        assert_eq!(value, json!({"type": "string"}));
    }

    #[test]
    fn test_yaml_by_extension() {
        let value = parse_document("schema.yaml", "type: string\nminLength: 2\n").unwrap();
        assert_eq!(value, json!({"type": "string", "minLength": 2}));
    }

    #[test]
    fn test_extensionless_falls_back_to_yaml() {
        let value = parse_document("http://example.com/s", "type: integer\n").unwrap();
        assert_eq!(value, json!({"type": "integer"}));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let err = parse_document("schema.json", ": {nonsense").unwrap_err();
        assert!(matches!(err, ResolveError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn test_missing_file_names_file_and_directory() {
        let err = load_file("some/dir/absent.json").unwrap_err();
        match err {
            ResolveError::FileNotFound { file, directory } => {
                assert_eq!(file, "absent.json");
                assert_eq!(directory, "some/dir");
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }
    }
}
