use jsv_core::{Draft, JsonType};
use serde_json::{Map, Value};

use super::{expect_count, expect_object, expect_string_list, ExtractionContext, KeywordExtractor};
use crate::error::SchemaError;
use crate::keyword::{Additional, Dependency, Pattern};
use crate::schema::SchemaBuilder;

/// Object keywords.
///
/// Draft 3 marks required properties inside each property schema
/// (`"required": true`) rather than listing them on the parent; both load
/// into the parent's required list. Draft 3 also allows a single string as
/// a property dependency.
pub struct ObjectExtractor;

impl KeywordExtractor for ObjectExtractor {
    fn name(&self) -> &'static str {
        "object"
    }

    fn keywords(&self, draft: Draft) -> &'static [&'static str] {
        match draft {
            Draft::Draft3 => &[
                "properties",
                "patternProperties",
                "additionalProperties",
                "required",
                "dependencies",
            ],
            Draft::Draft6 => &[
                "properties",
                "patternProperties",
                "additionalProperties",
                "required",
                "minProperties",
                "maxProperties",
                "propertyNames",
                "dependencies",
            ],
            _ => &[
                "properties",
                "patternProperties",
                "additionalProperties",
                "required",
                "minProperties",
                "maxProperties",
                "dependencies",
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
        let draft = cx.draft();

        let mut properties = Vec::new();
        let mut required_by_property = Vec::new();
        if let Some(value) = raw.get("properties") {
            let base = location.child(["properties"]);
            for (name, schema) in expect_object(&location, "properties", value)? {
                if draft == Draft::Draft3 && schema.get("required") == Some(&Value::Bool(true)) {
                    required_by_property.push(name.clone());
                }
                properties.push((name.clone(), cx.subschema(base.child([name]), schema)?));
            }
        }

        let mut pattern_properties = Vec::new();
        if let Some(value) = raw.get("patternProperties") {
            let base = location.child(["patternProperties"]);
            for (source, schema) in expect_object(&location, "patternProperties", value)? {
                let pattern = Pattern::new(source).map_err(|e| {
                    SchemaError::invalid_keyword(&location, "patternProperties", e.to_string())
                })?;
                pattern_properties.push((pattern, cx.subschema(base.child([source]), schema)?));
            }
        }

        let additional_properties = match raw.get("additionalProperties") {
            Some(Value::Bool(allowed)) => Some(Additional::Allowed(*allowed)),
            Some(value @ Value::Object(_)) => Some(Additional::Schema(
                cx.subschema(location.child(["additionalProperties"]), value)?,
            )),
            Some(other) => {
                return Err(SchemaError::invalid_keyword(
                    &location,
                    "additionalProperties",
                    format!("expected a boolean or a schema, found {}", JsonType::of(other)),
                ))
            }
            None => None,
        };

        let required = match raw.get("required") {
            // Draft 3 `required: true` is read by the parent.
            Some(Value::Bool(_)) if draft == Draft::Draft3 => Vec::new(),
            Some(value @ Value::Array(_)) if draft != Draft::Draft3 => {
                expect_string_list(&location, "required", value)?
            }
            Some(other) => {
                let expected = if draft == Draft::Draft3 {
                    "a boolean"
                } else {
                    "an array of strings"
                };
                cx.report().log_type_mismatch(&location, "required", expected, other);
                Vec::new()
            }
            None => Vec::new(),
        };

        let (min_properties, max_properties) = if draft == Draft::Draft3 {
            (None, None)
        } else {
            (
                raw.get("minProperties")
                    .map(|v| expect_count(&location, "minProperties", v))
                    .transpose()?,
                raw.get("maxProperties")
                    .map(|v| expect_count(&location, "maxProperties", v))
                    .transpose()?,
            )
        };

        let property_names = match raw.get("propertyNames") {
            Some(value) if draft.is_at_least(Draft::Draft6) => {
                Some(cx.subschema(location.child(["propertyNames"]), value)?)
            }
            _ => None,
        };

        let mut dependencies = Vec::new();
        if let Some(value) = raw.get("dependencies") {
            let base = location.child(["dependencies"]);
            for (name, dependency) in expect_object(&location, "dependencies", value)? {
                let parsed = match dependency {
                    Value::Array(_) => Dependency::Properties(expect_string_list(
                        &location,
                        "dependencies",
                        dependency,
                    )?),
                    Value::String(single) if draft == Draft::Draft3 => {
                        Dependency::Properties(vec![single.clone()])
                    }
                    Value::Object(_) => {
                        Dependency::Schema(cx.subschema(base.child([name]), dependency)?)
                    }
                    Value::Bool(_) if draft.allows_boolean_schemas() => {
                        Dependency::Schema(cx.subschema(base.child([name]), dependency)?)
                    }
                    other => {
                        return Err(SchemaError::invalid_keyword(
                            &location,
                            "dependencies",
                            format!(
                                "dependency '{name}' must be a schema or a property list, found {}",
                                JsonType::of(other)
                            ),
                        ))
                    }
                };
                dependencies.push((name.clone(), parsed));
            }
        }

        let object = builder.object_mut();
        for (name, id) in properties {
            object.add_property(name, id);
        }
        object.pattern_properties.extend(pattern_properties);
        object.additional_properties = object.additional_properties.or(additional_properties);
        for name in required_by_property.iter().chain(required.iter()) {
            object.require(name);
        }
        object.min_properties = object.min_properties.or(min_properties);
        object.max_properties = object.max_properties.or(max_properties);
        object.property_names = object.property_names.or(property_names);
        for (name, dependency) in dependencies {
            object.add_dependency(name, dependency);
        }
        Ok(())
    }
}
