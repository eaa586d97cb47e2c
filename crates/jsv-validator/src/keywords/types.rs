use jsv_schema::{KeywordName, Schema, TypeKeyword};

use crate::engine::Validator;
use crate::instance::PathAwareValue;
use crate::report::{ValidationError, ValidationReport};

pub(super) fn check_type(
    validator: &Validator<'_>,
    schema: &Schema,
    keyword: &TypeKeyword,
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    if keyword.types.accepts(instance.value()) {
        return;
    }
    // Draft 3 union members: the instance passes if any of them matches.
    let mut causes = Vec::new();
    for id in &keyword.schemas {
        match validator.evaluate(*id, instance).fold(instance, schema) {
            None => return,
            Some(cause) => causes.push(cause),
        }
    }

    let expected = if keyword.schemas.is_empty() {
        keyword.types.to_string()
    } else {
        format!("{} or one of {} schemas", keyword.types, keyword.schemas.len())
    };
    report.add_error(
        ValidationError::keyword(
            instance,
            schema,
            KeywordName::Type,
            format!("expected type {expected}, found {}", instance.json_type()),
        )
        .with_causes(causes),
    );
}

pub(super) fn check_disallow(
    validator: &Validator<'_>,
    schema: &Schema,
    keyword: &TypeKeyword,
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    let message = if keyword.types.accepts(instance.value()) {
        format!("type {} is disallowed", instance.json_type())
    } else if keyword.schemas.iter().any(|id| validator.matches(*id, instance)) {
        "value matches a disallowed schema".to_string()
    } else {
        return;
    };
    report.add_error(ValidationError::keyword(
        instance,
        schema,
        KeywordName::Disallow,
        message,
    ));
}
