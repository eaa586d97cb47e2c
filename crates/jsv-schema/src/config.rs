//! # Loader Configuration
//!
//! Settings that shape how schema documents are read. Deserializable so
//! the CLI can take them from a config file; every field has a default.

use jsv_core::Draft;
use serde::{Deserialize, Serialize};

/// Options for [`SchemaLoader`](crate::loader::SchemaLoader).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Draft used for documents without a recognised `$schema`.
    #[serde(default)]
    pub default_draft: Draft,

    /// URI given to a root schema loaded without one. When absent, a unique
    /// anonymous URI is minted per load.
    #[serde(default)]
    pub base_uri: Option<String>,

    /// Whether `$ref`s may reach documents outside the ones already loaded.
    #[serde(default = "default_allow_remote")]
    pub allow_remote: bool,
}

fn default_allow_remote() -> bool {
    true
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            default_draft: Draft::default(),
            base_uri: None,
            allow_remote: default_allow_remote(),
        }
    }
}

impl LoaderConfig {
    /// Builder: set the fallback draft.
    pub fn with_default_draft(mut self, draft: Draft) -> Self {
        self.default_draft = draft;
        self
    }

    /// Builder: set the base URI for root schemas.
    pub fn with_base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = Some(uri.into());
        self
    }

    /// Builder: forbid fetching documents.
    pub fn offline(mut self) -> Self {
        self.allow_remote = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: LoaderConfig = serde_json::from_str(r#"{"default_draft": "draft4"}"#).unwrap();
        assert_eq!(config.default_draft, Draft::Draft4);
        assert!(config.allow_remote);
        assert!(config.base_uri.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<LoaderConfig>(r#"{"drafts": 4}"#).is_err());
    }

    #[test]
    fn default_draft_is_six() {
        assert_eq!(LoaderConfig::default().default_draft, Draft::Draft6);
    }
}
