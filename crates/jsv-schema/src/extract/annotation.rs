use jsv_core::Draft;
use serde_json::{Map, Value};

use super::{ExtractionContext, KeywordExtractor};
use crate::error::SchemaError;
use crate::schema::SchemaBuilder;

/// Keywords with no validation effect: identifiers, `$schema`, titles,
/// defaults, `definitions`, draft 6 `examples`.
///
/// None of them can fail a load. A value of the wrong type is logged and
/// skipped. Definitions are loaded lazily, when a `$ref` reaches them.
pub struct AnnotationExtractor;

impl KeywordExtractor for AnnotationExtractor {
    fn name(&self) -> &'static str {
        "annotation"
    }

    fn keywords(&self, draft: Draft) -> &'static [&'static str] {
        if draft.is_at_least(Draft::Draft6) {
            &[
                "$id",
                "$schema",
                "title",
                "description",
                "default",
                "definitions",
                "examples",
            ]
        } else {
            &["id", "$schema", "title", "description", "default", "definitions"]
        }
    }

    fn extract(
        &self,
        raw: &Map<String, Value>,
        builder: &mut SchemaBuilder,
        cx: &mut ExtractionContext<'_, '_>,
    ) -> Result<(), SchemaError> {
        let location = builder.location().clone();
        let draft = cx.draft();

        for keyword in [draft.id_keyword(), "$schema"] {
            if let Some(value) = raw.get(keyword).filter(|v| !v.is_string()) {
                cx.report().log_type_mismatch(&location, keyword, "a string", value);
            }
        }

        match raw.get("title") {
            Some(Value::String(title)) => {
                builder.title(title.clone());
            }
            Some(other) => cx.report().log_type_mismatch(&location, "title", "a string", other),
            None => {}
        }
        match raw.get("description") {
            Some(Value::String(description)) => {
                builder.description(description.clone());
            }
            Some(other) => {
                cx.report()
                    .log_type_mismatch(&location, "description", "a string", other)
            }
            None => {}
        }

        if let Some(definitions) = raw.get("definitions") {
            match definitions {
                Value::Object(entries) => {
                    for (name, entry) in entries {
                        let is_schema = entry.is_object()
                            || (entry.is_boolean() && draft.allows_boolean_schemas());
                        if !is_schema {
                            cx.report().log_type_mismatch(
                                &location.child(["definitions"]),
                                name,
                                "a schema",
                                entry,
                            );
                        }
                    }
                }
                other => cx
                    .report()
                    .log_type_mismatch(&location, "definitions", "an object", other),
            }
        }

        if draft.is_at_least(Draft::Draft6) {
            if let Some(examples) = raw.get("examples").filter(|v| !v.is_array()) {
                cx.report()
                    .log_type_mismatch(&location, "examples", "an array", examples);
            }
        }
        Ok(())
    }
}
