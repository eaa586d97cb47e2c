//! # Schema Writer
//!
//! Renders a loaded node back to JSON in the dialect of a chosen draft. The
//! output is a self-contained document: every `$ref` target is written once
//! under `definitions` and referenced by a local pointer, so cyclic graphs
//! terminate and the result reloads without any fetcher.
//!
//! Writing is the inverse of extraction. Constructs the target draft has no
//! spelling for (draft 6 `contains` in draft 4, both an inclusive and an
//! exclusive bound on the same side before draft 6, `anyOf` in draft 3)
//! fail with [`SchemaError::IncompatibleDraft`] rather than being dropped.

use std::collections::BTreeMap;

use jsv_core::{Draft, JsonNumber, JsonTypeSet};
use serde_json::{json, Map, Value};

use crate::error::SchemaError;
use crate::keyword::{
    Additional, ArrayKeyword, Dependency, Items, Keyword, NumberKeyword, ObjectKeyword,
    StringKeyword, TypeKeyword,
};
use crate::schema::{Schema, SchemaGraph, SchemaId};

/// Write the node `id` of `graph` as a standalone `draft` document.
pub fn write_schema(graph: &SchemaGraph, id: SchemaId, draft: Draft) -> Result<Value, SchemaError> {
    let draft = draft.resolve(Draft::Draft6);
    let mut writer = Writer {
        graph,
        draft,
        root: id,
        definitions: BTreeMap::new(),
    };
    let body = writer.write_node(id)?;

    let Value::Object(body) = body else {
        return Ok(body);
    };
    let mut document = Map::new();
    if let Some(uri) = draft.schema_uri() {
        document.insert("$schema".to_string(), Value::String(uri.to_string()));
    }
    document.extend(body);
    if !writer.definitions.is_empty() {
        let definitions: Map<String, Value> = writer
            .definitions
            .into_iter()
            .filter_map(|(id, value)| Some((definition_name(id), value?)))
            .collect();
        document.insert("definitions".to_string(), Value::Object(definitions));
    }
    Ok(Value::Object(document))
}

/// Write the whole graph from its root.
pub fn write_graph(graph: &SchemaGraph, draft: Draft) -> Result<Value, SchemaError> {
    write_schema(graph, graph.root(), draft)
}

fn definition_name(id: SchemaId) -> String {
    format!("node{}", id.index())
}

struct Writer<'g> {
    graph: &'g SchemaGraph,
    draft: Draft,
    root: SchemaId,
    /// `None` while a definition is being written.
    definitions: BTreeMap<SchemaId, Option<Value>>,
}

impl Writer<'_> {
    fn write_node(&mut self, id: SchemaId) -> Result<Value, SchemaError> {
        let graph = self.graph;
        let schema = graph.schema(id);
        if schema.is_false() {
            return Ok(match self.draft {
                Draft::Draft3 => json!({"disallow": "any"}),
                d if d.allows_boolean_schemas() => Value::Bool(false),
                _ => json!({"not": {}}),
            });
        }

        let mut out = Map::new();
        if let Some(title) = schema.title() {
            out.insert("title".into(), Value::String(title.to_string()));
        }
        if let Some(description) = schema.description() {
            out.insert("description".into(), Value::String(description.to_string()));
        }
        for keyword in schema.keywords() {
            self.write_keyword(schema, keyword, &mut out)?;
        }
        Ok(Value::Object(out))
    }

    fn write_reference(&mut self, target: SchemaId) -> Result<Value, SchemaError> {
        if target == self.root {
            return Ok(json!({"$ref": "#"}));
        }
        if !self.definitions.contains_key(&target) {
            self.definitions.insert(target, None);
            let written = self.write_node(target)?;
            self.definitions.insert(target, Some(written));
        }
        Ok(json!({"$ref": format!("#/definitions/{}", definition_name(target))}))
    }

    fn write_keyword(
        &mut self,
        schema: &Schema,
        keyword: &Keyword,
        out: &mut Map<String, Value>,
    ) -> Result<(), SchemaError> {
        match keyword {
            Keyword::Type(t) => {
                let value = self.write_types(schema, "type", t)?;
                out.insert("type".into(), value);
            }
            Keyword::Disallow(t) => {
                if self.draft == Draft::Draft3 {
                    let value = self.write_types(schema, "disallow", t)?;
                    out.insert("disallow".into(), value);
                } else if !t.schemas.is_empty() || out.contains_key("not") {
                    return Err(self.incompatible(
                        schema,
                        "disallow",
                        "no equivalent for this form",
                    ));
                } else {
                    let types = self.write_types(schema, "disallow", t)?;
                    out.insert("not".into(), json!({ "type": types }));
                }
            }
            Keyword::Enum(values) => {
                out.insert("enum".into(), Value::Array(values.clone()));
            }
            Keyword::Const(value) => {
                if self.draft.is_at_least(Draft::Draft6) {
                    out.insert("const".into(), value.clone());
                } else if out.contains_key("enum") {
                    return Err(self.incompatible(schema, "const", "enum is already present"));
                } else {
                    out.insert("enum".into(), Value::Array(vec![value.clone()]));
                }
            }
            Keyword::Number(n) => self.write_number(schema, n, out)?,
            Keyword::String(s) => write_string(s, out),
            Keyword::Array(a) => self.write_array(schema, a, out)?,
            Keyword::Object(o) => self.write_object(schema, o, out)?,
            Keyword::AllOf(ids) => {
                let members = self.write_list(ids)?;
                let name = if self.draft == Draft::Draft3 { "extends" } else { "allOf" };
                out.insert(name.into(), members);
            }
            Keyword::AnyOf(ids) => {
                self.require_draft(schema, "anyOf", Draft::Draft4)?;
                let members = self.write_list(ids)?;
                out.insert("anyOf".into(), members);
            }
            Keyword::OneOf(ids) => {
                self.require_draft(schema, "oneOf", Draft::Draft4)?;
                let members = self.write_list(ids)?;
                out.insert("oneOf".into(), members);
            }
            Keyword::Not(id) => {
                self.require_draft(schema, "not", Draft::Draft4)?;
                if out.contains_key("not") {
                    let reason = "already used to express disallow";
                    return Err(self.incompatible(schema, "not", reason));
                }
                let value = self.write_node(*id)?;
                out.insert("not".into(), value);
            }
            Keyword::Ref(r) => {
                if let Value::Object(reference) = self.write_reference(r.target)? {
                    out.extend(reference);
                }
            }
            Keyword::False => {}
        }
        Ok(())
    }

    fn write_types(
        &mut self,
        schema: &Schema,
        keyword: &str,
        t: &TypeKeyword,
    ) -> Result<Value, SchemaError> {
        if !t.schemas.is_empty() && self.draft != Draft::Draft3 {
            return Err(self.incompatible(schema, keyword, "schemas as type union members"));
        }
        if self.draft == Draft::Draft3 && t.types == JsonTypeSet::all() && t.schemas.is_empty() {
            return Ok(Value::String("any".into()));
        }
        let mut members: Vec<Value> = t
            .types
            .iter()
            .map(|ty| Value::String(ty.as_str().to_string()))
            .collect();
        for id in &t.schemas {
            members.push(self.write_node(*id)?);
        }
        Ok(match members.len() {
            1 if t.schemas.is_empty() => members.remove(0),
            _ => Value::Array(members),
        })
    }

    fn write_number(
        &self,
        schema: &Schema,
        n: &NumberKeyword,
        out: &mut Map<String, Value>,
    ) -> Result<(), SchemaError> {
        let sides = [
            ("minimum", "exclusiveMinimum", &n.minimum, &n.exclusive_minimum),
            ("maximum", "exclusiveMaximum", &n.maximum, &n.exclusive_maximum),
        ];
        for (inclusive_key, exclusive_key, inclusive, exclusive) in sides {
            if self.draft.is_at_least(Draft::Draft6) {
                if let Some(bound) = inclusive {
                    out.insert(inclusive_key.into(), number(schema, bound)?);
                }
                if let Some(bound) = exclusive {
                    out.insert(exclusive_key.into(), number(schema, bound)?);
                }
                continue;
            }
            match (inclusive, exclusive) {
                (Some(_), Some(_)) => {
                    return Err(self.incompatible(
                        schema,
                        exclusive_key,
                        "an inclusive and an exclusive bound on the same side",
                    ))
                }
                (Some(bound), None) => {
                    out.insert(inclusive_key.into(), number(schema, bound)?);
                }
                (None, Some(bound)) => {
                    out.insert(inclusive_key.into(), number(schema, bound)?);
                    out.insert(exclusive_key.into(), Value::Bool(true));
                }
                (None, None) => {}
            }
        }
        if let Some(divisor) = &n.multiple_of {
            let name = if self.draft == Draft::Draft3 { "divisibleBy" } else { "multipleOf" };
            out.insert(name.into(), number(schema, divisor)?);
        }
        Ok(())
    }

    fn write_array(
        &mut self,
        schema: &Schema,
        a: &ArrayKeyword,
        out: &mut Map<String, Value>,
    ) -> Result<(), SchemaError> {
        match &a.items {
            Some(Items::Single(id)) => {
                let value = self.write_node(*id)?;
                out.insert("items".into(), value);
            }
            Some(Items::Tuple(ids)) => {
                let value = self.write_list(ids)?;
                out.insert("items".into(), value);
            }
            None => {}
        }
        if let Some(additional) = a.additional_items {
            let value = self.write_additional(additional)?;
            out.insert("additionalItems".into(), value);
        }
        if let Some(id) = a.contains {
            self.require_draft(schema, "contains", Draft::Draft6)?;
            let value = self.write_node(id)?;
            out.insert("contains".into(), value);
        }
        if a.unique_items {
            out.insert("uniqueItems".into(), Value::Bool(true));
        }
        if let Some(min) = a.min_items {
            out.insert("minItems".into(), min.into());
        }
        if let Some(max) = a.max_items {
            out.insert("maxItems".into(), max.into());
        }
        Ok(())
    }

    fn write_object(
        &mut self,
        schema: &Schema,
        o: &ObjectKeyword,
        out: &mut Map<String, Value>,
    ) -> Result<(), SchemaError> {
        let mut properties = Map::new();
        for (name, id) in &o.properties {
            properties.insert(name.clone(), self.write_node(*id)?);
        }

        if self.draft == Draft::Draft3 {
            for name in &o.required {
                let entry = properties
                    .entry(name.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                match entry {
                    Value::Object(property) => {
                        property.insert("required".into(), Value::Bool(true));
                    }
                    _ => {
                        return Err(self.incompatible(
                            schema,
                            "required",
                            format!("property '{name}' is not an object schema"),
                        ))
                    }
                }
            }
        } else if !o.required.is_empty() {
            out.insert("required".into(), json!(o.required));
        }

        if !properties.is_empty() {
            out.insert("properties".into(), Value::Object(properties));
        }
        if !o.pattern_properties.is_empty() {
            let mut patterns = Map::new();
            for (pattern, id) in &o.pattern_properties {
                patterns.insert(pattern.as_str().to_string(), self.write_node(*id)?);
            }
            out.insert("patternProperties".into(), Value::Object(patterns));
        }
        if let Some(additional) = o.additional_properties {
            let value = self.write_additional(additional)?;
            out.insert("additionalProperties".into(), value);
        }
        if o.min_properties.is_some() || o.max_properties.is_some() {
            self.require_draft(schema, "minProperties", Draft::Draft4)?;
        }
        if let Some(min) = o.min_properties {
            out.insert("minProperties".into(), min.into());
        }
        if let Some(max) = o.max_properties {
            out.insert("maxProperties".into(), max.into());
        }
        if let Some(id) = o.property_names {
            self.require_draft(schema, "propertyNames", Draft::Draft6)?;
            let value = self.write_node(id)?;
            out.insert("propertyNames".into(), value);
        }
        if !o.dependencies.is_empty() {
            let mut dependencies = Map::new();
            for (name, dependency) in &o.dependencies {
                let value = match dependency {
                    Dependency::Properties(names) => json!(names),
                    Dependency::Schema(id) => self.write_node(*id)?,
                };
                dependencies.insert(name.clone(), value);
            }
            out.insert("dependencies".into(), Value::Object(dependencies));
        }
        Ok(())
    }

    fn write_additional(&mut self, additional: Additional) -> Result<Value, SchemaError> {
        match additional {
            Additional::Allowed(allowed) => Ok(Value::Bool(allowed)),
            Additional::Schema(id) => self.write_node(id),
        }
    }

    fn write_list(&mut self, ids: &[SchemaId]) -> Result<Value, SchemaError> {
        ids.iter()
            .map(|id| self.write_node(*id))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn require_draft(
        &self,
        schema: &Schema,
        keyword: &str,
        since: Draft,
    ) -> Result<(), SchemaError> {
        if self.draft.is_at_least(since) {
            Ok(())
        } else {
            Err(self.incompatible(schema, keyword, format!("introduced in {since}")))
        }
    }

    fn incompatible(
        &self,
        schema: &Schema,
        keyword: &str,
        reason: impl Into<String>,
    ) -> SchemaError {
        SchemaError::incompatible(schema.location(), keyword, self.draft, reason)
    }
}

fn write_string(s: &StringKeyword, out: &mut Map<String, Value>) {
    if let Some(min) = s.min_length {
        out.insert("minLength".into(), min.into());
    }
    if let Some(max) = s.max_length {
        out.insert("maxLength".into(), max.into());
    }
    if let Some(pattern) = &s.pattern {
        out.insert("pattern".into(), Value::String(pattern.as_str().to_string()));
    }
    if let Some(format) = &s.format {
        out.insert("format".into(), Value::String(format.clone()));
    }
}

fn number(schema: &Schema, n: &JsonNumber) -> Result<Value, SchemaError> {
    n.to_json().map_err(|e| SchemaError::InvalidSchema {
        location: schema.location().clone(),
        reason: e.to_string(),
    })
}
