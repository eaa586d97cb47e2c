//! # Schema Graph
//!
//! Loaded schemas live in an arena. Every node is a [`Schema`] addressed by
//! a [`SchemaId`]; keywords refer to their subschemas by id, so a `$ref`
//! back to an ancestor is just an edge to an earlier slot.
//!
//! A [`SchemaBuilder`] accumulates keywords for one node while extractors
//! run. Setters only ever add: nothing an earlier extractor set is cleared
//! by a later one. [`SchemaBuilder::build`] freezes the result.
//!
//! A finished [`SchemaGraph`] is immutable and `Send + Sync`, so a single
//! graph can back validators on many threads.

use std::collections::HashMap;
use std::fmt;

use jsv_core::{JsonTypeSet, SchemaLocation};
use serde_json::Value;
use url::Url;

use crate::error::SchemaError;
use crate::keyword::{
    ArrayKeyword, Items, Keyword, NumberKeyword, ObjectKeyword, RefKeyword, StringKeyword,
    TypeKeyword,
};

/// Index of a node in a [`SchemaGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(usize);

impl SchemaId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Arena position.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One loaded schema node.
#[derive(Debug, Clone)]
pub struct Schema {
    location: SchemaLocation,
    keywords: Vec<Keyword>,
    types: JsonTypeSet,
    title: Option<String>,
    description: Option<String>,
}

impl Schema {
    /// Where this node was loaded from.
    pub fn location(&self) -> &SchemaLocation {
        &self.location
    }

    /// The node's identifying URI.
    pub fn unique_uri(&self) -> Url {
        self.location.unique_uri()
    }

    /// Constraint keywords in evaluation order.
    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    /// The JSON types an instance may have to pass this node's `type`.
    pub fn types(&self) -> JsonTypeSet {
        self.types
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// True for a node with no constraints at all (`{}` or `true`).
    pub fn accepts_everything(&self) -> bool {
        self.keywords.is_empty()
    }

    /// True for the boolean schema `false`.
    pub fn is_false(&self) -> bool {
        self.keywords.iter().any(|k| matches!(k, Keyword::False))
    }

    /// The `$ref` edge, when this node is a reference.
    pub fn reference(&self) -> Option<&RefKeyword> {
        self.keywords.iter().find_map(|k| match k {
            Keyword::Ref(r) => Some(r),
            _ => None,
        })
    }

    pub fn number(&self) -> Option<&NumberKeyword> {
        self.keywords.iter().find_map(|k| match k {
            Keyword::Number(n) => Some(n),
            _ => None,
        })
    }

    pub fn string(&self) -> Option<&StringKeyword> {
        self.keywords.iter().find_map(|k| match k {
            Keyword::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn array(&self) -> Option<&ArrayKeyword> {
        self.keywords.iter().find_map(|k| match k {
            Keyword::Array(a) => Some(a),
            _ => None,
        })
    }

    pub fn object(&self) -> Option<&ObjectKeyword> {
        self.keywords.iter().find_map(|k| match k {
            Keyword::Object(o) => Some(o),
            _ => None,
        })
    }

    /// The subschema declared under `properties/<name>`.
    pub fn expect_property(&self, name: &str) -> Result<SchemaId, SchemaError> {
        self.object()
            .and_then(|o| o.property(name))
            .ok_or_else(|| SchemaError::missing_key(&self.location.child(["properties"]), name))
    }

    /// The positional subschema declared at `items/<index>`.
    pub fn expect_item(&self, index: usize) -> Result<SchemaId, SchemaError> {
        match self.array().and_then(|a| a.items.as_ref()) {
            Some(Items::Tuple(ids)) => ids.get(index).copied().ok_or_else(|| {
                SchemaError::missing_key(&self.location.child(["items"]), &index.to_string())
            }),
            _ => Err(SchemaError::missing_key(&self.location, "items")),
        }
    }
}

/// Mutable accumulator for one node's keywords.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    location: SchemaLocation,
    type_keyword: Option<TypeKeyword>,
    disallow: Option<TypeKeyword>,
    enum_values: Option<Vec<Value>>,
    const_value: Option<Value>,
    number: NumberKeyword,
    string: StringKeyword,
    array: ArrayKeyword,
    object: ObjectKeyword,
    all_of: Vec<SchemaId>,
    any_of: Option<Vec<SchemaId>>,
    one_of: Option<Vec<SchemaId>>,
    not: Option<SchemaId>,
    reference: Option<RefKeyword>,
    always_false: bool,
    title: Option<String>,
    description: Option<String>,
}

impl SchemaBuilder {
    pub fn new(location: SchemaLocation) -> Self {
        Self {
            location,
            type_keyword: None,
            disallow: None,
            enum_values: None,
            const_value: None,
            number: NumberKeyword::default(),
            string: StringKeyword::default(),
            array: ArrayKeyword::default(),
            object: ObjectKeyword::default(),
            all_of: Vec::new(),
            any_of: None,
            one_of: None,
            not: None,
            reference: None,
            always_false: false,
            title: None,
            description: None,
        }
    }

    /// The location of the node being built.
    pub fn location(&self) -> &SchemaLocation {
        &self.location
    }

    pub fn type_keyword(&mut self, keyword: TypeKeyword) -> &mut Self {
        self.type_keyword = Some(keyword);
        self
    }

    pub fn disallow(&mut self, keyword: TypeKeyword) -> &mut Self {
        self.disallow = Some(keyword);
        self
    }

    pub fn enum_values(&mut self, values: Vec<Value>) -> &mut Self {
        self.enum_values = Some(values);
        self
    }

    pub fn const_value(&mut self, value: Value) -> &mut Self {
        self.const_value = Some(value);
        self
    }

    pub fn number_mut(&mut self) -> &mut NumberKeyword {
        &mut self.number
    }

    pub fn string_mut(&mut self) -> &mut StringKeyword {
        &mut self.string
    }

    pub fn array_mut(&mut self) -> &mut ArrayKeyword {
        &mut self.array
    }

    pub fn object_mut(&mut self) -> &mut ObjectKeyword {
        &mut self.object
    }

    /// Append `allOf` members. Draft 3 `extends` lands here too.
    pub fn all_of(&mut self, ids: impl IntoIterator<Item = SchemaId>) -> &mut Self {
        self.all_of.extend(ids);
        self
    }

    pub fn any_of(&mut self, ids: Vec<SchemaId>) -> &mut Self {
        self.any_of = Some(ids);
        self
    }

    pub fn one_of(&mut self, ids: Vec<SchemaId>) -> &mut Self {
        self.one_of = Some(ids);
        self
    }

    pub fn not(&mut self, id: SchemaId) -> &mut Self {
        self.not = Some(id);
        self
    }

    pub fn reference(&mut self, reference: RefKeyword) -> &mut Self {
        self.reference = Some(reference);
        self
    }

    /// Mark the node as the boolean schema `false`.
    pub fn always_false(&mut self) -> &mut Self {
        self.always_false = true;
        self
    }

    pub fn title(&mut self, title: String) -> &mut Self {
        self.title = Some(title);
        self
    }

    pub fn description(&mut self, description: String) -> &mut Self {
        self.description = Some(description);
        self
    }

    /// Freeze into a [`Schema`]. Type checks come first so a wrong-typed
    /// instance is reported as such before any content keyword runs.
    pub fn build(self) -> Schema {
        let types = match &self.type_keyword {
            Some(t) if t.schemas.is_empty() => t.types,
            _ => JsonTypeSet::all(),
        };

        let mut keywords = Vec::new();
        if self.always_false {
            keywords.push(Keyword::False);
        }
        if let Some(t) = self.type_keyword {
            keywords.push(Keyword::Type(t));
        }
        if let Some(d) = self.disallow {
            keywords.push(Keyword::Disallow(d));
        }
        if let Some(c) = self.const_value {
            keywords.push(Keyword::Const(c));
        }
        if let Some(e) = self.enum_values {
            keywords.push(Keyword::Enum(e));
        }
        if !self.number.is_empty() {
            keywords.push(Keyword::Number(self.number));
        }
        if !self.string.is_empty() {
            keywords.push(Keyword::String(self.string));
        }
        if !self.array.is_empty() {
            keywords.push(Keyword::Array(self.array));
        }
        if !self.object.is_empty() {
            keywords.push(Keyword::Object(self.object));
        }
        if !self.all_of.is_empty() {
            keywords.push(Keyword::AllOf(self.all_of));
        }
        if let Some(ids) = self.any_of {
            keywords.push(Keyword::AnyOf(ids));
        }
        if let Some(ids) = self.one_of {
            keywords.push(Keyword::OneOf(ids));
        }
        if let Some(id) = self.not {
            keywords.push(Keyword::Not(id));
        }
        if let Some(r) = self.reference {
            keywords.push(Keyword::Ref(r));
        }

        Schema {
            location: self.location,
            keywords,
            types,
            title: self.title,
            description: self.description,
        }
    }
}

/// An immutable, fully resolved schema graph.
#[derive(Debug, Clone)]
pub struct SchemaGraph {
    nodes: Vec<Schema>,
    root: SchemaId,
    by_uri: HashMap<String, SchemaId>,
}

impl SchemaGraph {
    pub(crate) fn new(nodes: Vec<Schema>, root: SchemaId) -> Self {
        let mut by_uri = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            by_uri
                .entry(node.unique_uri().to_string())
                .or_insert(SchemaId::new(index));
        }
        Self { nodes, root, by_uri }
    }

    /// The entry point.
    pub fn root(&self) -> SchemaId {
        self.root
    }

    /// The root node.
    pub fn root_schema(&self) -> &Schema {
        self.schema(self.root)
    }

    /// The node at `id`. Ids are only minted by the loader that built this
    /// graph, so every id reachable from it is in range.
    pub fn schema(&self, id: SchemaId) -> &Schema {
        &self.nodes[id.0]
    }

    /// The node at `id`, or `None` for an id from another graph.
    pub fn get(&self, id: SchemaId) -> Option<&Schema> {
        self.nodes.get(id.0)
    }

    /// Find a node by its unique URI.
    pub fn find(&self, uri: &str) -> Option<SchemaId> {
        self.by_uri.get(uri).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes with their ids, in load order.
    pub fn iter(&self) -> impl Iterator<Item = (SchemaId, &Schema)> {
        self.nodes.iter().enumerate().map(|(i, s)| (SchemaId(i), s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsv_core::JsonType;

    fn loc() -> SchemaLocation {
        SchemaLocation::parse_root("http://example.com/s.json").unwrap()
    }

    #[test]
    fn empty_builder_accepts_everything() {
        let schema = SchemaBuilder::new(loc()).build();
        assert!(schema.accepts_everything());
        assert_eq!(schema.types(), JsonTypeSet::all());
    }

    #[test]
    fn type_keyword_comes_first() {
        let mut builder = SchemaBuilder::new(loc());
        builder.string_mut().min_length = Some(2);
        builder.type_keyword(TypeKeyword {
            types: JsonTypeSet::empty().with(JsonType::String),
            schemas: vec![],
        });
        let schema = builder.build();
        assert!(matches!(schema.keywords()[0], Keyword::Type(_)));
        assert!(matches!(schema.keywords()[1], Keyword::String(_)));
        assert_eq!(schema.types(), JsonTypeSet::empty().with(JsonType::String));
    }

    #[test]
    fn all_of_accumulates() {
        let mut builder = SchemaBuilder::new(loc());
        builder.all_of([SchemaId::new(1)]);
        builder.all_of([SchemaId::new(2)]);
        let schema = builder.build();
        assert_eq!(schema.keywords(), &[Keyword::AllOf(vec![SchemaId::new(1), SchemaId::new(2)])]);
    }

    #[test]
    fn expect_property_reports_missing_key() {
        let mut builder = SchemaBuilder::new(loc());
        builder.object_mut().add_property("a".into(), SchemaId::new(1));
        let schema = builder.build();
        assert_eq!(schema.expect_property("a").unwrap(), SchemaId::new(1));
        let err = schema.expect_property("b").unwrap_err();
        assert_eq!(err.to_string(), "#/properties: Missing value at key [b]");
    }

    #[test]
    fn graph_finds_nodes_by_unique_uri() {
        let root = SchemaBuilder::new(loc()).build();
        let child = SchemaBuilder::new(loc().child(["definitions", "a"])).build();
        let graph = SchemaGraph::new(vec![root, child], SchemaId::new(0));
        assert_eq!(graph.find("http://example.com/s.json#/definitions/a"), Some(SchemaId::new(1)));
        assert_eq!(graph.find("http://example.com/s.json"), Some(SchemaId::new(0)));
        assert_eq!(graph.len(), 2);
        assert!(graph.get(SchemaId::new(5)).is_none());
    }

    #[test]
    fn graph_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaGraph>();
    }
}
