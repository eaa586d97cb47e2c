use jsv_core::{Draft, JsonType};
use serde_json::{Map, Value};

use super::{ExtractionContext, KeywordExtractor};
use crate::error::SchemaError;
use crate::schema::SchemaBuilder;

/// `allOf`, `anyOf`, `oneOf`, `not`; draft 3 `extends`.
pub struct CombinatorExtractor;

impl KeywordExtractor for CombinatorExtractor {
    fn name(&self) -> &'static str {
        "combinator"
    }

    fn keywords(&self, draft: Draft) -> &'static [&'static str] {
        match draft {
            Draft::Draft3 => &["extends"],
            _ => &["allOf", "anyOf", "oneOf", "not"],
        }
    }

    fn extract(
        &self,
        raw: &Map<String, Value>,
        builder: &mut SchemaBuilder,
        cx: &mut ExtractionContext<'_, '_>,
    ) -> Result<(), SchemaError> {
        let location = builder.location().clone();

        if cx.draft() == Draft::Draft3 {
            match raw.get("extends") {
                Some(value @ Value::Object(_)) => {
                    let id = cx.subschema(location.child(["extends"]), value)?;
                    builder.all_of([id]);
                }
                Some(value @ Value::Array(_)) => {
                    let ids = cx.subschema_list(&location, "extends", value)?;
                    builder.all_of(ids);
                }
                Some(other) => {
                    return Err(SchemaError::invalid_keyword(
                        &location,
                        "extends",
                        format!(
                            "expected a schema or an array of schemas, found {}",
                            JsonType::of(other)
                        ),
                    ))
                }
                None => {}
            }
            return Ok(());
        }

        if let Some(value) = raw.get("allOf") {
            let ids = cx.subschema_list(&location, "allOf", value)?;
            builder.all_of(ids);
        }
        if let Some(value) = raw.get("anyOf") {
            let ids = cx.subschema_list(&location, "anyOf", value)?;
            builder.any_of(ids);
        }
        if let Some(value) = raw.get("oneOf") {
            let ids = cx.subschema_list(&location, "oneOf", value)?;
            builder.one_of(ids);
        }
        if let Some(value) = raw.get("not") {
            let id = cx.subschema(location.child(["not"]), value)?;
            builder.not(id);
        }
        Ok(())
    }
}
