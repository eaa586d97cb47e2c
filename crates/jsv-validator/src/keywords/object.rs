use jsv_schema::{Additional, Dependency, KeywordName, ObjectKeyword, Schema};
use serde_json::Value;

use super::join_names;
use crate::engine::Validator;
use crate::instance::PathAwareValue;
use crate::report::{ValidationError, ValidationReport};

pub(super) fn check(
    validator: &Validator<'_>,
    schema: &Schema,
    keyword: &ObjectKeyword,
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    let Some(object) = instance.value().as_object() else {
        return;
    };

    check_members(validator, schema, keyword, instance, report);

    let missing: Vec<&str> = keyword
        .required
        .iter()
        .map(String::as_str)
        .filter(|name| !object.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        report.add_error(ValidationError::keyword(
            instance,
            schema,
            KeywordName::Required,
            format!("missing required properties: {}", join_names(missing)),
        ));
    }

    let count = object.len() as u64;
    if let Some(min) = keyword.min_properties {
        if count < min {
            report.add_error(ValidationError::keyword(
                instance,
                schema,
                KeywordName::MinProperties,
                format!("{count} properties is fewer than the minimum of {min}"),
            ));
        }
    }
    if let Some(max) = keyword.max_properties {
        if count > max {
            report.add_error(ValidationError::keyword(
                instance,
                schema,
                KeywordName::MaxProperties,
                format!("{count} properties is more than the maximum of {max}"),
            ));
        }
    }

    if let Some(id) = keyword.property_names {
        for (name, member) in instance.members() {
            let name_value = Value::String(name.to_string());
            let name_instance = PathAwareValue::at(&name_value, member.path().clone());
            let cause = validator.evaluate(id, &name_instance).fold(&name_instance, schema);
            if let Some(cause) = cause {
                report.add_error(
                    ValidationError::keyword(
                        &member,
                        schema,
                        KeywordName::PropertyNames,
                        format!("property name \"{name}\" is not valid"),
                    )
                    .with_causes(vec![cause]),
                );
            }
        }
    }

    for (name, dependency) in &keyword.dependencies {
        if !object.contains_key(name) {
            continue;
        }
        match dependency {
            Dependency::Properties(required) => {
                let missing: Vec<&str> = required
                    .iter()
                    .map(String::as_str)
                    .filter(|dep| !object.contains_key(*dep))
                    .collect();
                if !missing.is_empty() {
                    report.add_error(ValidationError::keyword(
                        instance,
                        schema,
                        KeywordName::Dependencies,
                        format!("property '{name}' requires {}", join_names(missing)),
                    ));
                }
            }
            Dependency::Schema(id) => {
                if let Some(cause) = validator.evaluate(*id, instance).fold(instance, schema) {
                    report.add_error(
                        ValidationError::keyword(
                            instance,
                            schema,
                            KeywordName::Dependencies,
                            format!("property '{name}' is present but its dependency schema fails"),
                        )
                        .with_causes(vec![cause]),
                    );
                }
            }
        }
    }
}

/// `properties`, `patternProperties` and `additionalProperties`. A member
/// is checked against its exact property and every matching pattern; only
/// members matched by neither fall to `additionalProperties`.
fn check_members(
    validator: &Validator<'_>,
    schema: &Schema,
    keyword: &ObjectKeyword,
    instance: &PathAwareValue<'_>,
    report: &mut ValidationReport,
) {
    let mut rejected: Vec<&str> = Vec::new();
    for (name, member) in instance.members() {
        let mut matched = false;
        if let Some(id) = keyword.property(name) {
            matched = true;
            validator.validate_schema(id, &member, report);
        }
        for (pattern, id) in &keyword.pattern_properties {
            if pattern.is_match(name) {
                matched = true;
                validator.validate_schema(*id, &member, report);
            }
        }
        if matched {
            continue;
        }
        match keyword.additional_properties {
            Some(Additional::Allowed(false)) => rejected.push(name),
            Some(Additional::Schema(id)) => {
                validator.validate_schema(id, &member, report);
            }
            Some(Additional::Allowed(true)) | None => {}
        }
    }
    if !rejected.is_empty() {
        report.add_error(ValidationError::keyword(
            instance,
            schema,
            KeywordName::AdditionalProperties,
            format!("additional properties are not allowed: {}", join_names(rejected)),
        ));
    }
}
