//! # Loading Diagnostics
//!
//! Problems that do not stop a schema from loading are collected in a
//! [`LoadingReport`] instead of being raised: an annotation keyword with a
//! value of the wrong type, an `exclusiveMinimum: true` without its
//! `minimum`, a keyword the active draft does not know. Each entry is also
//! emitted as a `tracing` warning at the moment it is logged.

use std::fmt;

use jsv_core::{JsonType, SchemaLocation};
use serde::Serialize;
use serde_json::Value;

/// What kind of problem a diagnostic describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The keyword value has the wrong JSON type and was ignored.
    TypeMismatch {
        /// Human description of the accepted type(s).
        expected: String,
        /// The type actually found.
        found: JsonType,
    },
    /// The keyword only has meaning next to a companion that is absent.
    MissingKeyword {
        /// The absent companion keyword.
        companion: String,
    },
    /// The keyword was recognised but has no effect here.
    Ignored {
        /// Why it has no effect.
        reason: String,
    },
    /// A `$ref` chain leads back to this node without descending into the
    /// instance. The schema loads; validation reports the loop when an
    /// instance reaches it.
    ReferenceCycle,
}

/// One non-fatal loading problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingDiagnostic {
    /// Unique URI of the schema node.
    pub location: String,
    /// The keyword concerned.
    pub keyword: String,
    /// The problem.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for LoadingDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::TypeMismatch { expected, found } => write!(
                f,
                "{}: keyword '{}' expects {expected}, found {found}; ignored",
                self.location, self.keyword
            ),
            DiagnosticKind::MissingKeyword { companion } => write!(
                f,
                "{}: keyword '{}' has no effect without '{companion}'",
                self.location, self.keyword
            ),
            DiagnosticKind::Ignored { reason } => write!(
                f,
                "{}: keyword '{}' ignored: {reason}",
                self.location, self.keyword
            ),
            DiagnosticKind::ReferenceCycle => write!(
                f,
                "{}: references loop back to this schema without descending into the instance",
                self.location
            ),
        }
    }
}

/// Accumulator for non-fatal loading diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadingReport {
    diagnostics: Vec<LoadingDiagnostic>,
}

impl LoadingReport {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a keyword whose value has the wrong type.
    pub fn log_type_mismatch(
        &mut self,
        location: &SchemaLocation,
        keyword: &str,
        expected: &str,
        found: &Value,
    ) {
        let found = JsonType::of(found);
        tracing::warn!(
            location = %location,
            keyword,
            expected,
            found = %found,
            "schema keyword has unexpected type"
        );
        self.push(location, keyword, DiagnosticKind::TypeMismatch {
            expected: expected.to_string(),
            found,
        });
    }

    /// Record a keyword whose companion keyword is absent.
    pub fn log_missing_keyword(
        &mut self,
        location: &SchemaLocation,
        keyword: &str,
        companion: &str,
    ) {
        tracing::warn!(
            location = %location,
            keyword,
            companion,
            "schema keyword is missing its companion"
        );
        self.push(location, keyword, DiagnosticKind::MissingKeyword {
            companion: companion.to_string(),
        });
    }

    /// Record a keyword that is recognised but has no effect.
    pub fn log_ignored(&mut self, location: &SchemaLocation, keyword: &str, reason: &str) {
        tracing::debug!(location = %location, keyword, reason, "schema keyword ignored");
        self.push(location, keyword, DiagnosticKind::Ignored {
            reason: reason.to_string(),
        });
    }

    /// Record a node that `$ref`s re-enter without consuming the instance.
    pub fn log_reference_cycle(&mut self, location: &SchemaLocation) {
        tracing::warn!(location = %location, "reference cycle does not descend into the instance");
        self.push(location, "$ref", DiagnosticKind::ReferenceCycle);
    }

    /// All diagnostics, in the order they were logged.
    pub fn diagnostics(&self) -> &[LoadingDiagnostic] {
        &self.diagnostics
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// True when nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn push(&mut self, location: &SchemaLocation, keyword: &str, kind: DiagnosticKind) {
        self.diagnostics.push(LoadingDiagnostic {
            location: location.unique_uri().to_string(),
            keyword: keyword.to_string(),
            kind,
        });
    }
}

impl fmt::Display for LoadingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loc() -> SchemaLocation {
        SchemaLocation::parse_root("http://example.com/s.json").unwrap().child(["properties", "a"])
    }

    #[test]
    fn type_mismatch_is_recorded_with_found_type() {
        let mut report = LoadingReport::new();
        report.log_type_mismatch(&loc(), "title", "a string", &json!(12));
        assert_eq!(report.len(), 1);
        let d = &report.diagnostics()[0];
        assert_eq!(d.keyword, "title");
        assert_eq!(d.location, "http://example.com/s.json#/properties/a");
        assert_eq!(d.kind, DiagnosticKind::TypeMismatch {
            expected: "a string".to_string(),
            found: JsonType::Integer,
        });
    }

    #[test]
    fn missing_keyword_renders_companion() {
        let mut report = LoadingReport::new();
        report.log_missing_keyword(&loc(), "exclusiveMinimum", "minimum");
        assert!(report.to_string().contains("without 'minimum'"));
    }

    #[test]
    fn reference_cycle_is_keyed_on_ref() {
        let mut report = LoadingReport::new();
        report.log_reference_cycle(&loc());
        let d = &report.diagnostics()[0];
        assert_eq!(d.keyword, "$ref");
        assert_eq!(d.kind, DiagnosticKind::ReferenceCycle);
        assert!(report.to_string().contains("without descending into the instance"));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["diagnostics"][0]["kind"], "reference_cycle");
    }

    #[test]
    fn serializes_flat() {
        let mut report = LoadingReport::new();
        report.log_ignored(&loc(), "const", "not part of draft4");
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["diagnostics"][0]["kind"], "ignored");
        assert_eq!(value["diagnostics"][0]["reason"], "not part of draft4");
    }
}
