use jsv_core::Draft;
use serde_json::{Map, Value};

use super::{expect_count, expect_str, ExtractionContext, KeywordExtractor};
use crate::error::SchemaError;
use crate::keyword::Pattern;
use crate::schema::SchemaBuilder;

/// `minLength`, `maxLength`, `pattern`, `format`.
pub struct StringExtractor;

impl KeywordExtractor for StringExtractor {
    fn name(&self) -> &'static str {
        "string"
    }

    fn keywords(&self, _draft: Draft) -> &'static [&'static str] {
        &["minLength", "maxLength", "pattern", "format"]
    }

    fn extract(
        &self,
        raw: &Map<String, Value>,
        builder: &mut SchemaBuilder,
        cx: &mut ExtractionContext<'_, '_>,
    ) -> Result<(), SchemaError> {
        let location = builder.location().clone();
        let min_length = raw
            .get("minLength")
            .map(|v| expect_count(&location, "minLength", v))
            .transpose()?;
        let max_length = raw
            .get("maxLength")
            .map(|v| expect_count(&location, "maxLength", v))
            .transpose()?;
        let pattern = match raw.get("pattern") {
            Some(value) => {
                let source = expect_str(&location, "pattern", value)?;
                Some(Pattern::new(source).map_err(|e| {
                    SchemaError::invalid_keyword(&location, "pattern", e.to_string())
                })?)
            }
            None => None,
        };
        // `format` is advisory: a malformed one is reported, not fatal.
        let format = match raw.get("format") {
            Some(Value::String(name)) => Some(name.clone()),
            Some(other) => {
                cx.report().log_type_mismatch(&location, "format", "a string", other);
                None
            }
            None => None,
        };

        let string = builder.string_mut();
        string.min_length = string.min_length.or(min_length);
        string.max_length = string.max_length.or(max_length);
        string.pattern = string.pattern.take().or(pattern);
        string.format = string.format.take().or(format);
        Ok(())
    }
}
