use jsv_core::Draft;
use serde_json::{Map, Value};

use super::{expect_str, ExtractionContext, KeywordExtractor};
use crate::error::SchemaError;
use crate::keyword::RefKeyword;
use crate::schema::SchemaBuilder;

/// `$ref`.
pub struct ReferenceExtractor;

impl KeywordExtractor for ReferenceExtractor {
    fn name(&self) -> &'static str {
        "$ref"
    }

    fn keywords(&self, _draft: Draft) -> &'static [&'static str] {
        &["$ref"]
    }

    fn extract(
        &self,
        raw: &Map<String, Value>,
        builder: &mut SchemaBuilder,
        cx: &mut ExtractionContext<'_, '_>,
    ) -> Result<(), SchemaError> {
        let Some(value) = raw.get("$ref") else {
            return Ok(());
        };
        let reference = expect_str(builder.location(), "$ref", value)?;
        let target = cx.resolve_ref(builder.location(), reference)?;
        builder.reference(RefKeyword {
            reference: reference.to_string(),
            target,
        });
        Ok(())
    }
}
