//! `allOf`, `anyOf`, `oneOf` and `not`. Each branch is validated into its
//! own report so the failures that explain a combinator error can be
//! attached to it as causes.

use jsv_schema::{KeywordName, Schema, SchemaId};

use crate::engine::Validator;
use crate::instance::PathAwareValue;
use crate::report::{ValidationError, ValidationReport};

pub(super) fn all_of(
    validator: &Validator<'_>,
    schema: &Schema,
    ids: &[SchemaId],
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    let mut causes = Vec::new();
    let mut failed = 0;
    for id in ids {
        let branch = validator.evaluate(*id, instance);
        if !branch.is_valid() {
            failed += 1;
            causes.extend(branch.into_errors());
        }
    }
    if failed > 0 {
        report.add_error(
            ValidationError::keyword(
                instance,
                schema,
                KeywordName::AllOf,
                format!("{failed} of {} schemas did not match", ids.len()),
            )
            .with_causes(causes),
        );
    }
}

pub(super) fn any_of(
    validator: &Validator<'_>,
    schema: &Schema,
    ids: &[SchemaId],
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    let mut causes = Vec::with_capacity(ids.len());
    for id in ids {
        match validator.evaluate(*id, instance).fold(instance, schema) {
            None => return,
            Some(cause) => causes.push(cause),
        }
    }
    report.add_error(
        ValidationError::keyword(
            instance,
            schema,
            KeywordName::AnyOf,
            format!("value matches none of the {} schemas", ids.len()),
        )
        .with_causes(causes),
    );
}

pub(super) fn one_of(
    validator: &Validator<'_>,
    schema: &Schema,
    ids: &[SchemaId],
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    let mut matching = Vec::new();
    let mut causes = Vec::new();
    for (index, id) in ids.iter().enumerate() {
        match validator.evaluate(*id, instance).fold(instance, schema) {
            None => matching.push(index.to_string()),
            Some(cause) => causes.push(cause),
        }
    }
    match matching.len() {
        1 => {}
        0 => report.add_error(
            ValidationError::keyword(
                instance,
                schema,
                KeywordName::OneOf,
                format!("value matches none of the {} schemas", ids.len()),
            )
            .with_causes(causes),
        ),
        _ => report.add_error(ValidationError::keyword(
            instance,
            schema,
            KeywordName::OneOf,
            format!(
                "value matches more than one schema (indices {})",
                matching.join(", ")
            ),
        )),
    }
}

pub(super) fn not(
    validator: &Validator<'_>,
    schema: &Schema,
    id: SchemaId,
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    if validator.matches(id, instance) {
        report.add_error(ValidationError::keyword(
            instance,
            schema,
            KeywordName::Not,
            "value must not match the schema",
        ));
    }
}
