use jsv_core::{Draft, JsonType, JsonTypeSet, SchemaLocation};
use serde_json::{Map, Value};

use super::{ExtractionContext, KeywordExtractor};
use crate::error::SchemaError;
use crate::keyword::TypeKeyword;
use crate::schema::SchemaBuilder;

/// `type`, plus draft 3 `disallow`.
///
/// Draft 3 also allows the pseudo-type `any` and schemas as union members:
/// `{"type": ["string", {"type": "object", "required": ...}]}`.
pub struct TypeExtractor;

impl KeywordExtractor for TypeExtractor {
    fn name(&self) -> &'static str {
        "type"
    }

    fn keywords(&self, draft: Draft) -> &'static [&'static str] {
        match draft {
            Draft::Draft3 => &["type", "disallow"],
            _ => &["type"],
        }
    }

    fn extract(
        &self,
        raw: &Map<String, Value>,
        builder: &mut SchemaBuilder,
        cx: &mut ExtractionContext<'_, '_>,
    ) -> Result<(), SchemaError> {
        if let Some(value) = raw.get("type") {
            let keyword = parse_types(builder.location(), "type", value, cx)?;
            builder.type_keyword(keyword);
        }
        if cx.draft() == Draft::Draft3 {
            if let Some(value) = raw.get("disallow") {
                let keyword = parse_types(builder.location(), "disallow", value, cx)?;
                builder.disallow(keyword);
            }
        }
        Ok(())
    }
}

fn parse_types(
    location: &SchemaLocation,
    keyword: &str,
    value: &Value,
    cx: &mut ExtractionContext<'_, '_>,
) -> Result<TypeKeyword, SchemaError> {
    let draft = cx.draft();
    let mut parsed = TypeKeyword::default();
    match value {
        Value::String(name) => add_type_name(&mut parsed.types, location, keyword, name, draft)?,
        Value::Array(members) => {
            for (i, member) in members.iter().enumerate() {
                match member {
                    Value::String(name) => {
                        add_type_name(&mut parsed.types, location, keyword, name, draft)?
                    }
                    Value::Object(_) if draft == Draft::Draft3 => {
                        let id = cx.subschema(location.child([keyword]).child([i]), member)?;
                        parsed.schemas.push(id);
                    }
                    other => {
                        return Err(SchemaError::invalid_keyword(
                            location,
                            keyword,
                            format!(
                                "union member {i} is a {}, not a type name",
                                JsonType::of(other)
                            ),
                        ))
                    }
                }
            }
        }
        other => {
            return Err(SchemaError::invalid_keyword(
                location,
                keyword,
                format!("expected a type name or an array, found {}", JsonType::of(other)),
            ))
        }
    }
    Ok(parsed)
}

fn add_type_name(
    types: &mut JsonTypeSet,
    location: &SchemaLocation,
    keyword: &str,
    name: &str,
    draft: Draft,
) -> Result<(), SchemaError> {
    if name == "any" && draft == Draft::Draft3 {
        *types = JsonTypeSet::all();
        return Ok(());
    }
    let ty = JsonType::from_name(name).ok_or_else(|| {
        SchemaError::invalid_keyword(location, keyword, format!("unknown type '{name}'"))
    })?;
    types.insert(ty);
    Ok(())
}
