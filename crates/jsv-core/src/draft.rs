//! # Draft Selection
//!
//! [`Draft`] names the JSON Schema draft a document is written in. It is
//! read from the `$schema` keyword when present and otherwise falls back
//! to a caller-chosen default via [`Draft::resolve`].
//!
//! Draft 5 was an editorial revision of draft 4 and shares its keyword
//! semantics; it is kept as its own variant so that documents declaring it
//! round-trip their declaration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::UnknownDraft;

/// JSON Schema draft selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Draft {
    /// Draft 3 (`http://json-schema.org/draft-03/schema#`).
    Draft3,
    /// Draft 4 (`http://json-schema.org/draft-04/schema#`).
    Draft4,
    /// Draft 5, keyword-compatible with draft 4.
    Draft5,
    /// Draft 6 (`http://json-schema.org/draft-06/schema#`).
    Draft6,
    /// A `$schema` URI that names no known draft.
    Custom,
    /// No `$schema` declaration.
    Unknown,
}

impl Draft {
    /// Map a `$schema` URI to a draft. Scheme (`http`/`https`) and a trailing
    /// empty fragment are ignored.
    pub fn from_schema_uri(uri: &str) -> Self {
        let trimmed = uri.trim().trim_end_matches('#');
        let without_scheme = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .unwrap_or(trimmed);
        match without_scheme {
            "json-schema.org/draft-03/schema" => Self::Draft3,
            "json-schema.org/draft-04/schema" => Self::Draft4,
            "json-schema.org/draft-05/schema" => Self::Draft5,
            "json-schema.org/draft-06/schema" => Self::Draft6,
            _ => Self::Custom,
        }
    }

    /// Detect the draft declared by a schema document.
    pub fn detect(document: &Value) -> Self {
        match document.get("$schema").and_then(Value::as_str) {
            Some(uri) => Self::from_schema_uri(uri),
            None => Self::Unknown,
        }
    }

    /// Replace `Unknown` and `Custom` with `default`. A default that is itself
    /// not a concrete draft falls back to draft 6.
    pub fn resolve(self, default: Draft) -> Draft {
        match self {
            Self::Unknown | Self::Custom => match default {
                Self::Unknown | Self::Custom => Self::Draft6,
                concrete => concrete,
            },
            concrete => concrete,
        }
    }

    /// Numeric revision, `0` for drafts that are not concrete.
    pub fn revision(self) -> u8 {
        match self {
            Self::Draft3 => 3,
            Self::Draft4 => 4,
            Self::Draft5 => 5,
            Self::Draft6 => 6,
            Self::Custom | Self::Unknown => 0,
        }
    }

    /// True when this draft is at least `other`.
    pub fn is_at_least(self, other: Draft) -> bool {
        self.revision() >= other.revision()
    }

    /// The keyword that changes the resolution scope in this draft.
    pub fn id_keyword(self) -> &'static str {
        if self.is_at_least(Self::Draft6) {
            "$id"
        } else {
            "id"
        }
    }

    /// True when `true`/`false` are valid schemas in this draft.
    pub fn allows_boolean_schemas(self) -> bool {
        self.is_at_least(Self::Draft6)
    }

    /// Canonical `$schema` URI for concrete drafts.
    pub fn schema_uri(self) -> Option<&'static str> {
        match self {
            Self::Draft3 => Some("http://json-schema.org/draft-03/schema#"),
            Self::Draft4 => Some("http://json-schema.org/draft-04/schema#"),
            Self::Draft5 => Some("http://json-schema.org/draft-05/schema#"),
            Self::Draft6 => Some("http://json-schema.org/draft-06/schema#"),
            Self::Custom | Self::Unknown => None,
        }
    }

    /// Short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft3 => "draft3",
            Self::Draft4 => "draft4",
            Self::Draft5 => "draft5",
            Self::Draft6 => "draft6",
            Self::Custom => "custom",
            Self::Unknown => "unknown",
        }
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::Draft6
    }
}

impl fmt::Display for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Draft {
    type Err = UnknownDraft;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "3" | "draft3" | "draft-03" => Ok(Self::Draft3),
            "4" | "draft4" | "draft-04" => Ok(Self::Draft4),
            "5" | "draft5" | "draft-05" => Ok(Self::Draft5),
            "6" | "draft6" | "draft-06" => Ok(Self::Draft6),
            _ => Err(UnknownDraft(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_known_schema_uris() {
        assert_eq!(
            Draft::from_schema_uri("http://json-schema.org/draft-04/schema#"),
            Draft::Draft4
        );
        assert_eq!(
            Draft::from_schema_uri("https://json-schema.org/draft-06/schema"),
            Draft::Draft6
        );
        assert_eq!(
            Draft::from_schema_uri("http://json-schema.org/draft-03/schema#"),
            Draft::Draft3
        );
        assert_eq!(
            Draft::from_schema_uri("http://example.com/my-meta#"),
            Draft::Custom
        );
    }

    #[test]
    fn detect_without_schema_is_unknown() {
        assert_eq!(Draft::detect(&json!({"type": "string"})), Draft::Unknown);
        assert_eq!(
            Draft::detect(&json!({"$schema": "http://json-schema.org/draft-05/schema#"})),
            Draft::Draft5
        );
    }

    #[test]
    fn resolve_replaces_only_non_concrete_drafts() {
        assert_eq!(Draft::Unknown.resolve(Draft::Draft4), Draft::Draft4);
        assert_eq!(Draft::Custom.resolve(Draft::Draft3), Draft::Draft3);
        assert_eq!(Draft::Draft3.resolve(Draft::Draft6), Draft::Draft3);
        assert_eq!(Draft::Unknown.resolve(Draft::Custom), Draft::Draft6);
    }

    #[test]
    fn id_keyword_changes_in_draft6() {
        assert_eq!(Draft::Draft3.id_keyword(), "id");
        assert_eq!(Draft::Draft4.id_keyword(), "id");
        assert_eq!(Draft::Draft5.id_keyword(), "id");
        assert_eq!(Draft::Draft6.id_keyword(), "$id");
    }

    #[test]
    fn parses_selector_strings() {
        assert_eq!("4".parse::<Draft>().unwrap(), Draft::Draft4);
        assert_eq!("draft-06".parse::<Draft>().unwrap(), Draft::Draft6);
        assert!("7".parse::<Draft>().is_err());
    }
}
