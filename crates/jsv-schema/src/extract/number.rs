use jsv_core::{Draft, JsonNumber, SchemaLocation};
use serde_json::{Map, Value};

use super::{expect_number, ExtractionContext, KeywordExtractor};
use crate::error::SchemaError;
use crate::schema::SchemaBuilder;

/// Numeric bounds.
///
/// Exclusivity is written two ways. Drafts 3 to 5 use a boolean flag that
/// modifies the sibling `minimum`/`maximum`; draft 6 makes
/// `exclusiveMinimum`/`exclusiveMaximum` bounds of their own. Both load
/// into the same model: a bound is either inclusive or exclusive, never a
/// flag. The draft 3 `divisibleBy` becomes `multipleOf`.
pub struct NumberExtractor;

impl KeywordExtractor for NumberExtractor {
    fn name(&self) -> &'static str {
        "number"
    }

    fn keywords(&self, draft: Draft) -> &'static [&'static str] {
        match draft {
            Draft::Draft3 => &[
                "minimum",
                "exclusiveMinimum",
                "maximum",
                "exclusiveMaximum",
                "divisibleBy",
            ],
            _ => &[
                "minimum",
                "exclusiveMinimum",
                "maximum",
                "exclusiveMaximum",
                "multipleOf",
            ],
        }
    }

    fn extract(
        &self,
        raw: &Map<String, Value>,
        builder: &mut SchemaBuilder,
        cx: &mut ExtractionContext<'_, '_>,
    ) -> Result<(), SchemaError> {
        let location = builder.location().clone();
        let (minimum, exclusive_minimum) =
            read_bound(raw, &location, "minimum", "exclusiveMinimum", cx)?;
        let (maximum, exclusive_maximum) =
            read_bound(raw, &location, "maximum", "exclusiveMaximum", cx)?;

        let divisor_key = if cx.draft() == Draft::Draft3 {
            "divisibleBy"
        } else {
            "multipleOf"
        };
        let multiple_of = match raw.get(divisor_key) {
            Some(value) => {
                let divisor = expect_number(&location, divisor_key, value)?;
                if !divisor.is_positive() {
                    return Err(SchemaError::invalid_keyword(
                        &location,
                        divisor_key,
                        format!("must be strictly greater than 0, found {divisor}"),
                    ));
                }
                Some(divisor)
            }
            None => None,
        };

        let number = builder.number_mut();
        number.minimum = number.minimum.take().or(minimum);
        number.exclusive_minimum = number.exclusive_minimum.take().or(exclusive_minimum);
        number.maximum = number.maximum.take().or(maximum);
        number.exclusive_maximum = number.exclusive_maximum.take().or(exclusive_maximum);
        number.multiple_of = number.multiple_of.take().or(multiple_of);
        Ok(())
    }
}

type Bound = (Option<JsonNumber>, Option<JsonNumber>);

/// Read one side's (inclusive, exclusive) pair.
fn read_bound(
    raw: &Map<String, Value>,
    location: &SchemaLocation,
    inclusive_key: &str,
    exclusive_key: &str,
    cx: &mut ExtractionContext<'_, '_>,
) -> Result<Bound, SchemaError> {
    let inclusive = raw
        .get(inclusive_key)
        .map(|v| expect_number(location, inclusive_key, v))
        .transpose()?;
    let boolean_form = !cx.draft().is_at_least(Draft::Draft6);

    match raw.get(exclusive_key) {
        None => Ok((inclusive, None)),
        Some(Value::Bool(exclusive)) if boolean_form => match inclusive {
            None => {
                cx.report().log_missing_keyword(location, exclusive_key, inclusive_key);
                Ok((None, None))
            }
            Some(bound) if *exclusive => Ok((None, Some(bound))),
            Some(bound) => Ok((Some(bound), None)),
        },
        Some(value @ Value::Number(_)) if !boolean_form => {
            Ok((inclusive, Some(expect_number(location, exclusive_key, value)?)))
        }
        Some(other) => Err(SchemaError::invalid_keyword(
            location,
            exclusive_key,
            format!(
                "expected {} in {}, found {}",
                if boolean_form { "a boolean" } else { "a number" },
                cx.draft(),
                jsv_core::JsonType::of(other)
            ),
        )),
    }
}
