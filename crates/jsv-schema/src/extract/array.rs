use jsv_core::{Draft, JsonType};
use serde_json::{Map, Value};

use super::{expect_bool, expect_count, ExtractionContext, KeywordExtractor};
use crate::error::SchemaError;
use crate::keyword::{Additional, Items};
use crate::schema::SchemaBuilder;

/// `items`, `additionalItems`, `uniqueItems`, `minItems`, `maxItems`, and
/// draft 6 `contains`.
pub struct ArrayExtractor;

impl KeywordExtractor for ArrayExtractor {
    fn name(&self) -> &'static str {
        "array"
    }

    fn keywords(&self, draft: Draft) -> &'static [&'static str] {
        if draft.is_at_least(Draft::Draft6) {
            &[
                "items",
                "additionalItems",
                "contains",
                "uniqueItems",
                "minItems",
                "maxItems",
            ]
        } else {
            &["items", "additionalItems", "uniqueItems", "minItems", "maxItems"]
        }
    }

    fn extract(
        &self,
        raw: &Map<String, Value>,
        builder: &mut SchemaBuilder,
        cx: &mut ExtractionContext<'_, '_>,
    ) -> Result<(), SchemaError> {
        let location = builder.location().clone();

        let items = match raw.get("items") {
            Some(Value::Array(members)) => {
                let base = location.child(["items"]);
                let mut ids = Vec::with_capacity(members.len());
                for (i, member) in members.iter().enumerate() {
                    ids.push(cx.subschema(base.child([i]), member)?);
                }
                Some(Items::Tuple(ids))
            }
            Some(value @ (Value::Object(_) | Value::Bool(_))) => {
                Some(Items::Single(cx.subschema(location.child(["items"]), value)?))
            }
            Some(other) => {
                return Err(SchemaError::invalid_keyword(
                    &location,
                    "items",
                    format!(
                        "expected a schema or an array of schemas, found {}",
                        JsonType::of(other)
                    ),
                ))
            }
            None => None,
        };

        let additional_items = match raw.get("additionalItems") {
            Some(Value::Bool(allowed)) => Some(Additional::Allowed(*allowed)),
            Some(value @ Value::Object(_)) => Some(Additional::Schema(
                cx.subschema(location.child(["additionalItems"]), value)?,
            )),
            Some(other) => {
                return Err(SchemaError::invalid_keyword(
                    &location,
                    "additionalItems",
                    format!("expected a boolean or a schema, found {}", JsonType::of(other)),
                ))
            }
            None => None,
        };

        let contains = match raw.get("contains") {
            Some(value) if cx.draft().is_at_least(Draft::Draft6) => {
                Some(cx.subschema(location.child(["contains"]), value)?)
            }
            _ => None,
        };

        let unique_items = raw
            .get("uniqueItems")
            .map(|v| expect_bool(&location, "uniqueItems", v))
            .transpose()?
            .unwrap_or(false);
        let min_items = raw
            .get("minItems")
            .map(|v| expect_count(&location, "minItems", v))
            .transpose()?;
        let max_items = raw
            .get("maxItems")
            .map(|v| expect_count(&location, "maxItems", v))
            .transpose()?;

        let array = builder.array_mut();
        array.items = array.items.take().or(items);
        array.additional_items = array.additional_items.or(additional_items);
        array.contains = array.contains.or(contains);
        array.unique_items |= unique_items;
        array.min_items = array.min_items.or(min_items);
        array.max_items = array.max_items.or(max_items);
        Ok(())
    }
}
