//! # Keywords
//!
//! The closed set of constraint keywords a loaded schema node can hold.
//! Keywords that only make sense for one JSON type are grouped into one
//! variant per type ([`NumberKeyword`], [`StringKeyword`], [`ArrayKeyword`],
//! [`ObjectKeyword`]) so a validator can skip a whole group when the
//! instance has a different type.
//!
//! Subschemas are referenced by [`SchemaId`] into the owning
//! [`SchemaGraph`](crate::schema::SchemaGraph), never by pointer, which is
//! what lets `$ref` cycles exist without ownership cycles.
//!
//! Draft differences are erased here. A draft 4 `{"minimum": 5,
//! "exclusiveMinimum": true}` and a draft 6 `{"exclusiveMinimum": 5}` both
//! load as `exclusive_minimum = 5`; draft 3 `divisibleBy` loads as
//! `multiple_of`; draft 3 `extends` loads as `AllOf`.

use std::fmt;

use jsv_core::{JsonNumber, JsonType, JsonTypeSet};
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::schema::SchemaId;

/// Keyword names as they appear in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeywordName {
    Type,
    Disallow,
    Enum,
    Const,
    Minimum,
    ExclusiveMinimum,
    Maximum,
    ExclusiveMaximum,
    MultipleOf,
    MinLength,
    MaxLength,
    Pattern,
    Format,
    Items,
    AdditionalItems,
    Contains,
    UniqueItems,
    MinItems,
    MaxItems,
    Properties,
    PatternProperties,
    AdditionalProperties,
    Required,
    MinProperties,
    MaxProperties,
    PropertyNames,
    Dependencies,
    AllOf,
    AnyOf,
    OneOf,
    Not,
    Ref,
}

impl KeywordName {
    /// The keyword as spelled in draft 4+ schemas.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Disallow => "disallow",
            Self::Enum => "enum",
            Self::Const => "const",
            Self::Minimum => "minimum",
            Self::ExclusiveMinimum => "exclusiveMinimum",
            Self::Maximum => "maximum",
            Self::ExclusiveMaximum => "exclusiveMaximum",
            Self::MultipleOf => "multipleOf",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Pattern => "pattern",
            Self::Format => "format",
            Self::Items => "items",
            Self::AdditionalItems => "additionalItems",
            Self::Contains => "contains",
            Self::UniqueItems => "uniqueItems",
            Self::MinItems => "minItems",
            Self::MaxItems => "maxItems",
            Self::Properties => "properties",
            Self::PatternProperties => "patternProperties",
            Self::AdditionalProperties => "additionalProperties",
            Self::Required => "required",
            Self::MinProperties => "minProperties",
            Self::MaxProperties => "maxProperties",
            Self::PropertyNames => "propertyNames",
            Self::Dependencies => "dependencies",
            Self::AllOf => "allOf",
            Self::AnyOf => "anyOf",
            Self::OneOf => "oneOf",
            Self::Not => "not",
            Self::Ref => "$ref",
        }
    }

    /// Stable error code, `validation.keyword.<name>`.
    pub fn code(self) -> String {
        format!("validation.keyword.{}", self.as_str())
    }
}

impl fmt::Display for KeywordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for KeywordName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A compiled regular expression that remembers its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source`.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(source)?,
        })
    }

    /// The pattern as written in the schema.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Unanchored search: true when the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// `type` (or draft 3 `disallow`): primitive type names plus, in draft 3,
/// schemas that act as union alternatives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeKeyword {
    /// Primitive types named by the keyword.
    pub types: JsonTypeSet,
    /// Draft 3 union members given as schemas.
    pub schemas: Vec<SchemaId>,
}

/// Numeric bounds, with exclusivity already folded into separate fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberKeyword {
    pub minimum: Option<JsonNumber>,
    pub exclusive_minimum: Option<JsonNumber>,
    pub maximum: Option<JsonNumber>,
    pub exclusive_maximum: Option<JsonNumber>,
    pub multiple_of: Option<JsonNumber>,
}

impl NumberKeyword {
    /// True when no bound is set.
    pub fn is_empty(&self) -> bool {
        self.minimum.is_none()
            && self.exclusive_minimum.is_none()
            && self.maximum.is_none()
            && self.exclusive_maximum.is_none()
            && self.multiple_of.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringKeyword {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<Pattern>,
    pub format: Option<String>,
}

impl StringKeyword {
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
            && self.format.is_none()
    }
}

/// `items`: one schema for every element, or a tuple of positional schemas.
#[derive(Debug, Clone, PartialEq)]
pub enum Items {
    Single(SchemaId),
    Tuple(Vec<SchemaId>),
}

/// `additionalItems` / `additionalProperties`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Additional {
    /// `true` or `false`.
    Allowed(bool),
    /// A schema every additional member must satisfy.
    Schema(SchemaId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayKeyword {
    pub items: Option<Items>,
    pub additional_items: Option<Additional>,
    pub contains: Option<SchemaId>,
    pub unique_items: bool,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

impl ArrayKeyword {
    pub fn is_empty(&self) -> bool {
        self.items.is_none()
            && self.additional_items.is_none()
            && self.contains.is_none()
            && !self.unique_items
            && self.min_items.is_none()
            && self.max_items.is_none()
    }
}

/// One entry of `dependencies`.
#[derive(Debug, Clone, PartialEq)]
pub enum Dependency {
    /// Property names that must also be present.
    Properties(Vec<String>),
    /// A schema the whole object must satisfy.
    Schema(SchemaId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectKeyword {
    /// `properties`, in declaration order.
    pub properties: Vec<(String, SchemaId)>,
    pub pattern_properties: Vec<(Pattern, SchemaId)>,
    pub additional_properties: Option<Additional>,
    /// Required property names, in declaration order, without duplicates.
    pub required: Vec<String>,
    pub min_properties: Option<u64>,
    pub max_properties: Option<u64>,
    pub property_names: Option<SchemaId>,
    /// `dependencies`, in declaration order.
    pub dependencies: Vec<(String, Dependency)>,
}

impl ObjectKeyword {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.pattern_properties.is_empty()
            && self.additional_properties.is_none()
            && self.required.is_empty()
            && self.min_properties.is_none()
            && self.max_properties.is_none()
            && self.property_names.is_none()
            && self.dependencies.is_empty()
    }

    /// The subschema declared for `name` under `properties`.
    pub fn property(&self, name: &str) -> Option<SchemaId> {
        self.properties.iter().find(|(n, _)| n == name).map(|(_, id)| *id)
    }

    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    /// Declare a property. The first declaration of a name wins.
    pub fn add_property(&mut self, name: String, id: SchemaId) {
        if self.property(&name).is_none() {
            self.properties.push((name, id));
        }
    }

    /// Declare a dependency. The first declaration of a name wins.
    pub fn add_dependency(&mut self, name: String, dependency: Dependency) {
        if self.dependency(&name).is_none() {
            self.dependencies.push((name, dependency));
        }
    }

    /// Add a required name unless already present.
    pub fn require(&mut self, name: &str) {
        if !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
    }
}

/// A resolved `$ref` edge.
#[derive(Debug, Clone, PartialEq)]
pub struct RefKeyword {
    /// The reference as written.
    pub reference: String,
    /// The node it resolved to.
    pub target: SchemaId,
}

/// One constraint held by a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum Keyword {
    Type(TypeKeyword),
    Disallow(TypeKeyword),
    Enum(Vec<Value>),
    Const(Value),
    Number(NumberKeyword),
    String(StringKeyword),
    Array(ArrayKeyword),
    Object(ObjectKeyword),
    AllOf(Vec<SchemaId>),
    AnyOf(Vec<SchemaId>),
    OneOf(Vec<SchemaId>),
    Not(SchemaId),
    Ref(RefKeyword),
    /// The boolean schema `false`: nothing validates.
    False,
}

impl Keyword {
    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Type(_) => "type",
            Self::Disallow(_) => "disallow",
            Self::Enum(_) => "enum",
            Self::Const(_) => "const",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::AllOf(_) => "allOf",
            Self::AnyOf(_) => "anyOf",
            Self::OneOf(_) => "oneOf",
            Self::Not(_) => "not",
            Self::Ref(_) => "$ref",
            Self::False => "false",
        }
    }

    /// The JSON type this keyword constrains, or `None` when it applies to
    /// every instance.
    pub fn applicable_type(&self) -> Option<JsonType> {
        match self {
            Self::Number(_) => Some(JsonType::Number),
            Self::String(_) => Some(JsonType::String),
            Self::Array(_) => Some(JsonType::Array),
            Self::Object(_) => Some(JsonType::Object),
            _ => None,
        }
    }

    /// Direct subschema edges, `$ref` targets included.
    pub fn subschemas(&self) -> Vec<SchemaId> {
        match self {
            Self::Type(t) | Self::Disallow(t) => t.schemas.clone(),
            Self::Array(a) => {
                let mut out = Vec::new();
                match &a.items {
                    Some(Items::Single(id)) => out.push(*id),
                    Some(Items::Tuple(ids)) => out.extend(ids),
                    None => {}
                }
                if let Some(Additional::Schema(id)) = a.additional_items {
                    out.push(id);
                }
                out.extend(a.contains);
                out
            }
            Self::Object(o) => {
                let mut out: Vec<SchemaId> = o.properties.iter().map(|(_, id)| *id).collect();
                out.extend(o.pattern_properties.iter().map(|(_, id)| *id));
                if let Some(Additional::Schema(id)) = o.additional_properties {
                    out.push(id);
                }
                out.extend(o.property_names);
                out.extend(o.dependencies.iter().filter_map(|(_, d)| match d {
                    Dependency::Schema(id) => Some(*id),
                    Dependency::Properties(_) => None,
                }));
                out
            }
            Self::AllOf(ids) | Self::AnyOf(ids) | Self::OneOf(ids) => ids.clone(),
            Self::Not(id) => vec![*id],
            Self::Ref(r) => vec![r.target],
            Self::Enum(_) | Self::Const(_) | Self::Number(_) | Self::String(_) | Self::False => {
                Vec::new()
            }
        }
    }

    /// Subschema edges evaluated against the same instance rather than a
    /// member or element of it.
    pub fn same_instance_subschemas(&self) -> Vec<SchemaId> {
        match self {
            Self::Type(t) | Self::Disallow(t) => t.schemas.clone(),
            Self::Object(o) => o
                .dependencies
                .iter()
                .filter_map(|(_, d)| match d {
                    Dependency::Schema(id) => Some(*id),
                    Dependency::Properties(_) => None,
                })
                .collect(),
            Self::AllOf(ids) | Self::AnyOf(ids) | Self::OneOf(ids) => ids.clone(),
            Self::Not(id) => vec![*id],
            Self::Ref(r) => vec![r.target],
            _ => Vec::new(),
        }
    }
}
