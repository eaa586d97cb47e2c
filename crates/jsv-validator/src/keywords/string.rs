use jsv_schema::{KeywordName, Schema, StringKeyword};

use crate::config::FormatPolicy;
use crate::engine::Validator;
use crate::instance::PathAwareValue;
use crate::report::{ValidationError, ValidationReport};

pub(super) fn check(
    validator: &Validator<'_>,
    schema: &Schema,
    keyword: &StringKeyword,
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    let Some(text) = instance.value().as_str() else {
        return;
    };
    // Lengths count code points.
    let length = text.chars().count() as u64;
    let mut fail = |name: KeywordName, message: String| {
        report.add_error(ValidationError::keyword(instance, schema, name, message));
    };

    if let Some(min) = keyword.min_length {
        if length < min {
            fail(
                KeywordName::MinLength,
                format!("length {length} is shorter than the minimum of {min}"),
            );
        }
    }
    if let Some(max) = keyword.max_length {
        if length > max {
            fail(
                KeywordName::MaxLength,
                format!("length {length} is longer than the maximum of {max}"),
            );
        }
    }
    if let Some(pattern) = &keyword.pattern {
        if !pattern.is_match(text) {
            fail(
                KeywordName::Pattern,
                format!("\"{text}\" does not match the pattern {}", pattern.as_str()),
            );
        }
    }
    if let Some(format) = &keyword.format {
        let policy = validator.config().format_policy;
        if policy == FormatPolicy::Ignore {
            return;
        }
        match validator.formats().get(format) {
            Some(checker) => {
                if let Some(message) = checker.validate(text) {
                    fail(KeywordName::Format, message);
                }
            }
            None if policy == FormatPolicy::EnforceStrict => {
                fail(KeywordName::Format, format!("unknown format '{format}'"));
            }
            None => tracing::trace!(format = %format, "unknown format ignored"),
        }
    }
}
