use jsv_core::Draft;
use serde_json::{Map, Value};

use super::{expect_array, ExtractionContext, KeywordExtractor};
use crate::error::SchemaError;
use crate::schema::SchemaBuilder;

/// `enum`, plus draft 6 `const`. Values are kept verbatim so number
/// literals keep their scale.
pub struct ValueExtractor;

impl KeywordExtractor for ValueExtractor {
    fn name(&self) -> &'static str {
        "value"
    }

    fn keywords(&self, draft: Draft) -> &'static [&'static str] {
        if draft.is_at_least(Draft::Draft6) {
            &["enum", "const"]
        } else {
            &["enum"]
        }
    }

    fn extract(
        &self,
        raw: &Map<String, Value>,
        builder: &mut SchemaBuilder,
        cx: &mut ExtractionContext<'_, '_>,
    ) -> Result<(), SchemaError> {
        if let Some(value) = raw.get("enum") {
            let values = expect_array(builder.location(), "enum", value)?.to_vec();
            builder.enum_values(values);
        }
        if cx.draft().is_at_least(Draft::Draft6) {
            if let Some(value) = raw.get("const") {
                builder.const_value(value.clone());
            }
        }
        Ok(())
    }
}
