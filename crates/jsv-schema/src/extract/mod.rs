//! # Keyword Extraction
//!
//! Turns one raw schema object into a [`SchemaBuilder`]'s keywords. The
//! work is split across [`KeywordExtractor`]s, one per keyword family, run
//! in a fixed order by an [`ExtractionPipeline`]. Each extractor reads only
//! the keys it owns for the active draft and adds to the builder; none of
//! them clears what another set.
//!
//! ## Draft handling
//!
//! Extractors receive the document's draft through the
//! [`ExtractionContext`] and branch on it locally. The keyword model they
//! produce is draft-neutral, so nothing past this module knows drafts exist.
//!
//! ## `$ref`
//!
//! In drafts 3 to 6 a `$ref` replaces its object: when one is present only
//! extractors that own `$ref` run and the siblings are ignored.
//!
//! ## Errors
//!
//! A constraint keyword holding a value of the wrong type is fatal. An
//! annotation keyword holding one is logged to the
//! [`LoadingReport`] and skipped.

mod annotation;
mod array;
mod combinator;
mod number;
mod object;
mod reference;
mod string;
mod types;
mod value;

use jsv_core::{Draft, JsonNumber, JsonType, SchemaLocation};
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::report::LoadingReport;
use crate::resolver::ReferenceResolver;
use crate::schema::{SchemaBuilder, SchemaId};

pub use annotation::AnnotationExtractor;
pub use array::ArrayExtractor;
pub use combinator::CombinatorExtractor;
pub use number::NumberExtractor;
pub use object::ObjectExtractor;
pub use reference::ReferenceExtractor;
pub use string::StringExtractor;
pub use types::TypeExtractor;
pub use value::ValueExtractor;

const CONCRETE_DRAFTS: [Draft; 4] = [Draft::Draft3, Draft::Draft4, Draft::Draft5, Draft::Draft6];

/// Reads one family of keywords from a raw schema object.
pub trait KeywordExtractor: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// The keys this extractor reads under `draft`.
    fn keywords(&self, draft: Draft) -> &'static [&'static str];

    /// Read this extractor's keys from `raw` into `builder`.
    fn extract(
        &self,
        raw: &Map<String, Value>,
        builder: &mut SchemaBuilder,
        cx: &mut ExtractionContext<'_, '_>,
    ) -> Result<(), SchemaError>;
}

/// What an extractor can reach while it runs.
pub struct ExtractionContext<'r, 'a> {
    resolver: &'r mut ReferenceResolver<'a>,
    report: &'r mut LoadingReport,
    draft: Draft,
}

impl<'r, 'a> ExtractionContext<'r, 'a> {
    /// The draft of the document being read.
    pub fn draft(&self) -> Draft {
        self.draft
    }

    /// The loading report, for non-fatal diagnostics.
    pub fn report(&mut self) -> &mut LoadingReport {
        self.report
    }

    /// Load `value` as the subschema at `location`.
    pub fn subschema(
        &mut self,
        location: SchemaLocation,
        value: &Value,
    ) -> Result<SchemaId, SchemaError> {
        self.resolver.load_schema(location, value, self.report)
    }

    /// Load every element of a non-empty array as subschemas at
    /// `location/<keyword>/<i>`.
    pub fn subschema_list(
        &mut self,
        location: &SchemaLocation,
        keyword: &str,
        value: &Value,
    ) -> Result<Vec<SchemaId>, SchemaError> {
        let items = expect_array(location, keyword, value)?;
        if items.is_empty() {
            return Err(SchemaError::invalid_keyword(
                location,
                keyword,
                "expected a non-empty array of schemas",
            ));
        }
        let base = location.child([keyword]);
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.subschema(base.child([i]), item))
            .collect()
    }

    /// Resolve a `$ref` written at `location`.
    pub fn resolve_ref(
        &mut self,
        location: &SchemaLocation,
        reference: &str,
    ) -> Result<SchemaId, SchemaError> {
        self.resolver.resolve_ref(location, reference, self.report)
    }
}

/// The ordered set of extractors applied to every schema object.
pub struct ExtractionPipeline {
    extractors: Vec<Box<dyn KeywordExtractor>>,
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl ExtractionPipeline {
    /// The built-in extractors, covering drafts 3 to 6.
    pub fn standard() -> Self {
        Self {
            extractors: vec![
                Box::new(ReferenceExtractor),
                Box::new(TypeExtractor),
                Box::new(ValueExtractor),
                Box::new(NumberExtractor),
                Box::new(StringExtractor),
                Box::new(ArrayExtractor),
                Box::new(ObjectExtractor),
                Box::new(CombinatorExtractor),
                Box::new(AnnotationExtractor),
            ],
        }
    }

    /// Append an extractor after the built-in ones.
    pub fn with_extractor(mut self, extractor: impl KeywordExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Extractor names, in run order.
    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Run every applicable extractor over `raw` and return the builder.
    pub fn extract_schema(
        &self,
        raw: &Map<String, Value>,
        mut builder: SchemaBuilder,
        resolver: &mut ReferenceResolver<'_>,
        report: &mut LoadingReport,
    ) -> Result<SchemaBuilder, SchemaError> {
        let draft = resolver.draft_of(builder.location());
        let is_reference = raw.contains_key("$ref");
        let mut cx = ExtractionContext {
            resolver,
            report,
            draft,
        };

        for extractor in &self.extractors {
            if is_reference && !extractor.keywords(draft).contains(&"$ref") {
                continue;
            }
            tracing::trace!(
                extractor = extractor.name(),
                location = %builder.location(),
                "extracting"
            );
            extractor.extract(raw, &mut builder, &mut cx)?;
        }

        if is_reference {
            if raw.len() > 1 {
                tracing::debug!(location = %builder.location(), "keywords beside $ref ignored");
            }
            return Ok(builder);
        }

        for key in raw.keys() {
            if self.owns(key, draft) || key == "$schema" {
                continue;
            }
            if CONCRETE_DRAFTS.iter().any(|d| self.owns(key, *d)) {
                cx.report
                    .log_ignored(builder.location(), key, &format!("not a {draft} keyword"));
            } else {
                tracing::trace!(location = %builder.location(), keyword = %key, "unknown keyword");
            }
        }
        Ok(builder)
    }

    fn owns(&self, key: &str, draft: Draft) -> bool {
        self.extractors
            .iter()
            .any(|e| e.keywords(draft).contains(&key))
    }
}

// ── Typed readers ──────────────────────────────────────────────────────
//
// Shared by the extractors. Each returns a fatal `InvalidKeyword` when the
// value has the wrong shape.

fn wrong_type(
    location: &SchemaLocation,
    keyword: &str,
    expected: &str,
    found: &Value,
) -> SchemaError {
    SchemaError::invalid_keyword(
        location,
        keyword,
        format!("expected {expected}, found {}", JsonType::of(found)),
    )
}

pub(crate) fn expect_number(
    location: &SchemaLocation,
    keyword: &str,
    value: &Value,
) -> Result<JsonNumber, SchemaError> {
    match value {
        Value::Number(_) => JsonNumber::from_value(value)
            .map_err(|e| SchemaError::invalid_keyword(location, keyword, e.to_string())),
        other => Err(wrong_type(location, keyword, "a number", other)),
    }
}

pub(crate) fn expect_count(
    location: &SchemaLocation,
    keyword: &str,
    value: &Value,
) -> Result<u64, SchemaError> {
    expect_number(location, keyword, value)?
        .as_u64()
        .ok_or_else(|| wrong_type(location, keyword, "a non-negative integer", value))
}

pub(crate) fn expect_bool(
    location: &SchemaLocation,
    keyword: &str,
    value: &Value,
) -> Result<bool, SchemaError> {
    value
        .as_bool()
        .ok_or_else(|| wrong_type(location, keyword, "a boolean", value))
}

pub(crate) fn expect_str<'v>(
    location: &SchemaLocation,
    keyword: &str,
    value: &'v Value,
) -> Result<&'v str, SchemaError> {
    value
        .as_str()
        .ok_or_else(|| wrong_type(location, keyword, "a string", value))
}

pub(crate) fn expect_object<'v>(
    location: &SchemaLocation,
    keyword: &str,
    value: &'v Value,
) -> Result<&'v Map<String, Value>, SchemaError> {
    value
        .as_object()
        .ok_or_else(|| wrong_type(location, keyword, "an object", value))
}

pub(crate) fn expect_array<'v>(
    location: &SchemaLocation,
    keyword: &str,
    value: &'v Value,
) -> Result<&'v [Value], SchemaError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| wrong_type(location, keyword, "an array", value))
}

/// An array of unique strings.
pub(crate) fn expect_string_list(
    location: &SchemaLocation,
    keyword: &str,
    value: &Value,
) -> Result<Vec<String>, SchemaError> {
    let mut names: Vec<String> = Vec::new();
    for item in expect_array(location, keyword, value)? {
        let name = item
            .as_str()
            .ok_or_else(|| wrong_type(location, keyword, "an array of strings", item))?;
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loc() -> SchemaLocation {
        SchemaLocation::parse_root("http://example.com/s.json").unwrap()
    }

    #[test]
    fn standard_pipeline_runs_reference_first() {
        let names = ExtractionPipeline::standard().extractor_names();
        assert_eq!(names.first(), Some(&"$ref"));
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn count_rejects_negative_and_fractional() {
        assert_eq!(expect_count(&loc(), "minItems", &json!(3)).unwrap(), 3);
        assert!(expect_count(&loc(), "minItems", &json!(-1)).is_err());
        assert!(expect_count(&loc(), "minItems", &json!(1.5)).is_err());
        assert!(expect_count(&loc(), "minItems", &json!("3")).is_err());
    }

    #[test]
    fn string_list_dedups() {
        let names = expect_string_list(&loc(), "required", &json!(["a", "b", "a"])).unwrap();
        assert_eq!(names, vec!["a", "b"]);
        assert!(expect_string_list(&loc(), "required", &json!(["a", 1])).is_err());
    }
}
