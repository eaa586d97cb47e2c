//! `enum` and `const`. Both compare with lexical equality: numbers match
//! only when value and written scale agree, so `1.0` is not `1.00`.

use jsv_core::lexically_equal;
use jsv_schema::{KeywordName, Schema};
use serde_json::Value;

use crate::instance::PathAwareValue;
use crate::report::{ValidationError, ValidationReport};

pub(super) fn check_enum(
    schema: &Schema,
    values: &[Value],
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    if values.iter().any(|candidate| lexically_equal(candidate, instance.value())) {
        return;
    }
    report.add_error(ValidationError::keyword(
        instance,
        schema,
        KeywordName::Enum,
        format!(
            "{} is not one of the allowed values {}",
            instance.value(),
            Value::Array(values.to_vec())
        ),
    ));
}

pub(super) fn check_const(
    schema: &Schema,
    expected: &Value,
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    if lexically_equal(expected, instance.value()) {
        return;
    }
    report.add_error(ValidationError::keyword(
        instance,
        schema,
        KeywordName::Const,
        format!("{} is not the constant {expected}", instance.value()),
    ));
}
