//! # Document Fetchers
//!
//! A [`DocumentFetcher`] turns an absolute URI into a parsed JSON document.
//! The resolver calls it for `$ref`s that point outside every document it
//! already knows.
//!
//! - [`InMemoryFetcher`]: documents registered up front by URI.
//! - [`FileFetcher`]: `file://` URIs, parsed as JSON, or as YAML for
//!   `.yaml`/`.yml` paths.
//! - [`ChainFetcher`]: tries several fetchers in order.
//! - [`NoFetch`]: refuses everything; for fully self-contained schemas.
//!
//! Network retrieval is not built in. Callers that need it implement
//! [`DocumentFetcher`] over their own HTTP client.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use url::Url;

use crate::error::FetchError;

/// Source of schema documents, keyed by absolute URI (fragment removed).
pub trait DocumentFetcher: Send + Sync {
    /// Retrieve and parse the document at `uri`.
    fn fetch(&self, uri: &Url) -> Result<Value, FetchError>;
}

/// Documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFetcher {
    documents: HashMap<String, Value>,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `document` under `uri`. A trailing empty fragment is ignored.
    pub fn insert(&mut self, uri: &str, document: Value) {
        self.documents.insert(normalize_key(uri), document);
    }

    /// Builder form of [`InMemoryFetcher::insert`].
    pub fn with(mut self, uri: &str, document: Value) -> Self {
        self.insert(uri, document);
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentFetcher for InMemoryFetcher {
    fn fetch(&self, uri: &Url) -> Result<Value, FetchError> {
        self.documents
            .get(&normalize_key(uri.as_str()))
            .cloned()
            .ok_or_else(|| FetchError::NotFound(uri.to_string()))
    }
}

/// Reads `file://` URIs from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl DocumentFetcher for FileFetcher {
    fn fetch(&self, uri: &Url) -> Result<Value, FetchError> {
        if uri.scheme() != "file" {
            return Err(FetchError::UnsupportedScheme(uri.scheme().to_string()));
        }
        let path = uri
            .to_file_path()
            .map_err(|()| FetchError::NotFound(uri.to_string()))?;
        tracing::debug!(path = %path.display(), "reading schema document");
        read_document(&path)
    }
}

/// Tries each fetcher in order and returns the first success. When all
/// fail, the last error is returned.
#[derive(Default)]
pub struct ChainFetcher {
    fetchers: Vec<Box<dyn DocumentFetcher>>,
}

impl ChainFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fetcher to the chain.
    pub fn with(mut self, fetcher: impl DocumentFetcher + 'static) -> Self {
        self.fetchers.push(Box::new(fetcher));
        self
    }
}

impl DocumentFetcher for ChainFetcher {
    fn fetch(&self, uri: &Url) -> Result<Value, FetchError> {
        let mut last = FetchError::NotFound(uri.to_string());
        for fetcher in &self.fetchers {
            match fetcher.fetch(uri) {
                Ok(document) => return Ok(document),
                Err(e) => {
                    tracing::trace!(uri = %uri, error = %e, "fetcher declined, trying next");
                    last = e;
                }
            }
        }
        Err(last)
    }
}

/// Refuses every URI.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFetch;

impl DocumentFetcher for NoFetch {
    fn fetch(&self, uri: &Url) -> Result<Value, FetchError> {
        Err(FetchError::NotFound(uri.to_string()))
    }
}

/// Read a JSON or YAML document from disk. The format is chosen by file
/// extension; anything but `.yaml`/`.yml` is parsed as JSON.
pub fn read_document(path: &Path) -> Result<Value, FetchError> {
    let content = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    if is_yaml {
        parse_yaml(&content)
    } else {
        serde_json::from_str(&content).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

/// Parse YAML text into a JSON value.
pub fn parse_yaml(content: &str) -> Result<Value, FetchError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| FetchError::Parse(e.to_string()))?;
    yaml_to_json_value(&yaml).map_err(FetchError::Parse)
}

/// Convert a YAML tree to JSON. Map keys must be scalars; tags are dropped.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(u.into()))
            } else {
                // Floats go through their text so the decimal reading is kept.
                n.to_string()
                    .parse::<serde_json::Number>()
                    .map(Value::Number)
                    .map_err(|_| format!("cannot represent YAML number {n} in JSON"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

fn normalize_key(uri: &str) -> String {
    uri.strip_suffix('#').unwrap_or(uri).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn in_memory_ignores_empty_fragment() {
        let fetcher =
            InMemoryFetcher::new().with("http://example.com/a.json#", json!({"type": "string"}));
        assert_eq!(
            fetcher.fetch(&url("http://example.com/a.json")).unwrap(),
            json!({"type": "string"})
        );
        assert!(matches!(
            fetcher.fetch(&url("http://example.com/b.json")),
            Err(FetchError::NotFound(_))
        ));
    }

    #[test]
    fn file_fetcher_reads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("a.json");
        std::fs::write(&json_path, r#"{"minimum": 1.50}"#).unwrap();
        let yaml_path = dir.path().join("b.yaml");
        let mut f = std::fs::File::create(&yaml_path).unwrap();
        writeln!(f, "type: object\nrequired:\n  - name").unwrap();

        let a = FileFetcher.fetch(&Url::from_file_path(&json_path).unwrap()).unwrap();
        assert_eq!(a["minimum"].to_string(), "1.50");

        let b = FileFetcher.fetch(&Url::from_file_path(&yaml_path).unwrap()).unwrap();
        assert_eq!(b, json!({"type": "object", "required": ["name"]}));
    }

    #[test]
    fn file_fetcher_rejects_other_schemes() {
        assert!(matches!(
            FileFetcher.fetch(&url("http://example.com/a.json")),
            Err(FetchError::UnsupportedScheme(s)) if s == "http"
        ));
    }

    #[test]
    fn chain_returns_first_success() {
        let chain = ChainFetcher::new()
            .with(NoFetch)
            .with(InMemoryFetcher::new().with("urn:x", json!(true)));
        assert_eq!(chain.fetch(&url("urn:x")).unwrap(), json!(true));
        assert!(chain.fetch(&url("urn:y")).is_err());
    }

    #[test]
    fn yaml_tags_are_dropped() {
        let value = parse_yaml("a: !custom 3\nb: [1, two]").unwrap();
        assert_eq!(value, json!({"a": 3, "b": [1, "two"]}));
    }
}
