use jsv_core::JsonNumber;
use jsv_schema::{KeywordName, NumberKeyword, Schema};

use crate::instance::PathAwareValue;
use crate::report::{ValidationError, ValidationReport};

pub(super) fn check(
    schema: &Schema,
    keyword: &NumberKeyword,
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    let value = match JsonNumber::from_value(instance.value()) {
        Ok(value) => value,
        Err(error) => {
            tracing::trace!(pointer = %instance.pointer(), %error, "numeric keywords skipped");
            return;
        }
    };
    let mut fail = |name: KeywordName, message: String| {
        report.add_error(ValidationError::keyword(instance, schema, name, message));
    };

    if let Some(min) = &keyword.minimum {
        if value < *min {
            fail(KeywordName::Minimum, format!("{value} is less than the minimum of {min}"));
        }
    }
    if let Some(min) = &keyword.exclusive_minimum {
        if value <= *min {
            fail(
                KeywordName::ExclusiveMinimum,
                format!("{value} is not greater than the exclusive minimum of {min}"),
            );
        }
    }
    if let Some(max) = &keyword.maximum {
        if value > *max {
            fail(KeywordName::Maximum, format!("{value} is greater than the maximum of {max}"));
        }
    }
    if let Some(max) = &keyword.exclusive_maximum {
        if value >= *max {
            fail(
                KeywordName::ExclusiveMaximum,
                format!("{value} is not less than the exclusive maximum of {max}"),
            );
        }
    }
    if let Some(divisor) = &keyword.multiple_of {
        if !value.is_multiple_of(divisor) {
            fail(KeywordName::MultipleOf, format!("{value} is not a multiple of {divisor}"));
        }
    }
}
