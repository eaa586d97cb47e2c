use jsv_core::lexically_equal;
use jsv_schema::{Additional, ArrayKeyword, Items, KeywordName, Schema};

use crate::engine::Validator;
use crate::instance::PathAwareValue;
use crate::report::{ValidationError, ValidationReport};

pub(super) fn check(
    validator: &Validator<'_>,
    schema: &Schema,
    keyword: &ArrayKeyword,
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    let Some(items) = instance.value().as_array() else {
        return;
    };
    let len = items.len() as u64;

    match &keyword.items {
        Some(Items::Single(id)) => {
            for element in instance.elements() {
                validator.validate_schema(*id, &element, report);
            }
        }
        Some(Items::Tuple(ids)) => check_tuple(validator, schema, keyword, ids, instance, report),
        None => {}
    }

    if let Some(id) = keyword.contains {
        if !instance.elements().any(|element| validator.matches(id, &element)) {
            report.add_error(ValidationError::keyword(
                instance,
                schema,
                KeywordName::Contains,
                "no element matches the contains schema",
            ));
        }
    }

    if keyword.unique_items {
        if let Some((first, second)) = first_duplicate(items) {
            report.add_error(ValidationError::keyword(
                instance,
                schema,
                KeywordName::UniqueItems,
                format!("items at {first} and {second} are equal"),
            ));
        }
    }

    if let Some(min) = keyword.min_items {
        if len < min {
            report.add_error(ValidationError::keyword(
                instance,
                schema,
                KeywordName::MinItems,
                format!("{len} items is fewer than the minimum of {min}"),
            ));
        }
    }
    if let Some(max) = keyword.max_items {
        if len > max {
            report.add_error(ValidationError::keyword(
                instance,
                schema,
                KeywordName::MaxItems,
                format!("{len} items is more than the maximum of {max}"),
            ));
        }
    }
}

fn check_tuple(
    validator: &Validator<'_>,
    schema: &Schema,
    keyword: &ArrayKeyword,
    ids: &[jsv_schema::SchemaId],
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    let mut extra = 0usize;
    for (index, element) in instance.elements().enumerate() {
        match (ids.get(index), keyword.additional_items) {
            (Some(id), _) => {
                validator.validate_schema(*id, &element, report);
            }
            (None, Some(Additional::Schema(id))) => {
                validator.validate_schema(id, &element, report);
            }
            (None, Some(Additional::Allowed(false))) => extra += 1,
            (None, Some(Additional::Allowed(true)) | None) => {}
        }
    }
    if extra > 0 {
        report.add_error(ValidationError::keyword(
            instance,
            schema,
            KeywordName::AdditionalItems,
            format!(
                "{} items given but only {} allowed",
                ids.len() + extra,
                ids.len()
            ),
        ));
    }
}

/// The first pair of lexically equal elements, by index.
fn first_duplicate(items: &[serde_json::Value]) -> Option<(usize, usize)> {
    for (i, a) in items.iter().enumerate() {
        for (j, b) in items.iter().enumerate().skip(i + 1) {
            if lexically_equal(a, b) {
                return Some((i, j));
            }
        }
    }
    None
}
