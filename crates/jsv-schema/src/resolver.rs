//! # Reference Resolution
//!
//! The [`ReferenceResolver`] owns everything that exists only while a
//! schema is being loaded: the documents seen so far, an index of every
//! `id`/`$id` they declare, the node cache and the arena slots.
//!
//! ## Cycles
//!
//! A node's slot is reserved and cached under its canonical key (document
//! URI plus JSON path) before any of its keywords are extracted. A `$ref`
//! that leads back to a node still under construction therefore finds the
//! reserved id and stops there. Recursive schemas load in one pass and
//! share nodes.
//!
//! ## Lookup order
//!
//! A `$ref` is resolved against the resolution scope of the node holding
//! it. The resulting URI, fragment removed, is looked up:
//!
//! 1. among documents already registered,
//! 2. in the identifier index (a subschema that declared that URI),
//! 3. through the [`DocumentFetcher`].
//!
//! A fragment starting with `/` is a JSON Pointer relative to whatever was
//! found. Any other fragment is a plain name looked up in the identifier
//! index.

use std::collections::HashMap;
use std::rc::Rc;

use jsv_core::location::without_fragment;
use jsv_core::{Draft, JsonPath, JsonType, SchemaLocation};
use serde_json::Value;
use url::Url;

use crate::config::LoaderConfig;
use crate::error::SchemaError;
use crate::extract::ExtractionPipeline;
use crate::fetch::DocumentFetcher;
use crate::report::LoadingReport;
use crate::schema::{Schema, SchemaBuilder, SchemaGraph, SchemaId};

/// Keywords whose values are data, never schemas.
const DATA_KEYWORDS: [&str; 4] = ["enum", "const", "default", "examples"];

/// Keywords whose values map names to schemas.
const SCHEMA_MAP_KEYWORDS: [&str; 4] =
    ["properties", "patternProperties", "definitions", "dependencies"];

/// A registered schema document.
#[derive(Debug)]
struct Document {
    uri: Url,
    root: Value,
    draft: Draft,
}

#[derive(Debug)]
enum Slot {
    Reserved(SchemaLocation),
    Filled(Schema),
}

/// Load-time state: documents, identifiers, cache and arena.
pub struct ReferenceResolver<'a> {
    config: &'a LoaderConfig,
    fetcher: &'a dyn DocumentFetcher,
    pipeline: &'a ExtractionPipeline,
    documents: HashMap<Url, Rc<Document>>,
    identifiers: HashMap<String, (Url, JsonPath)>,
    cache: HashMap<String, SchemaId>,
    slots: Vec<Slot>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(
        config: &'a LoaderConfig,
        fetcher: &'a dyn DocumentFetcher,
        pipeline: &'a ExtractionPipeline,
    ) -> Self {
        Self {
            config,
            fetcher,
            pipeline,
            documents: HashMap::new(),
            identifiers: HashMap::new(),
            cache: HashMap::new(),
            slots: Vec::new(),
        }
    }

    /// Register `document` under `uri` and load its root node.
    pub fn load_root(
        &mut self,
        uri: Url,
        document: Value,
        report: &mut LoadingReport,
    ) -> Result<SchemaId, SchemaError> {
        let doc = self.register_document(uri, document, None);
        let location = SchemaLocation::document_root(doc.uri.clone());
        self.load_schema(location, &doc.root, report)
    }

    /// Load the schema `value` found at `location`, or return the node
    /// already loaded there.
    pub fn load_schema(
        &mut self,
        location: SchemaLocation,
        value: &Value,
        report: &mut LoadingReport,
    ) -> Result<SchemaId, SchemaError> {
        let key = location.canonical_key();
        if let Some(&id) = self.cache.get(&key) {
            tracing::trace!(location = %location, id = %id, "schema served from cache");
            return Ok(id);
        }

        let draft = self.draft_of(&location);
        match value {
            Value::Bool(accept) if draft.allows_boolean_schemas() => {
                let id = self.reserve(key, &location);
                let mut builder = SchemaBuilder::new(location);
                if !accept {
                    builder.always_false();
                }
                self.fill(id, builder.build());
                Ok(id)
            }
            Value::Object(map) => {
                let location = match declared_identifier(value, draft) {
                    Some(identifier) => location.rescoped(identifier)?,
                    None => location,
                };
                let id = self.reserve(key, &location);
                tracing::trace!(location = %location, id = %id, "loading schema");
                let pipeline = self.pipeline;
                let builder =
                    pipeline.extract_schema(map, SchemaBuilder::new(location), self, report)?;
                self.fill(id, builder.build());
                Ok(id)
            }
            other => Err(SchemaError::InvalidSchema {
                location,
                reason: format!(
                    "expected {}, found {}",
                    if draft.allows_boolean_schemas() {
                        "an object or a boolean"
                    } else {
                        "an object"
                    },
                    JsonType::of(other)
                ),
            }),
        }
    }

    /// Resolve `reference` as written at `location` and load its target.
    pub fn resolve_ref(
        &mut self,
        location: &SchemaLocation,
        reference: &str,
        report: &mut LoadingReport,
    ) -> Result<SchemaId, SchemaError> {
        let target = location
            .resolve(reference)
            .map_err(|e| SchemaError::unresolvable(location, reference, e.to_string()))?;
        let (doc, path) = self.locate(&target, location, reference)?;

        let key = SchemaLocation::key_for(&doc.uri, &path);
        if let Some(&id) = self.cache.get(&key) {
            tracing::trace!(reference, target = %target, "reference served from cache");
            return Ok(id);
        }

        let value = path.resolve(&doc.root).ok_or_else(|| {
            SchemaError::unresolvable(location, reference, missing_key(&doc, &path).to_string())
        })?;
        let target_location = location_at(&doc, &path)?;
        tracing::debug!(reference, target = %target_location, "resolved reference");
        self.load_schema(target_location, value, report)
    }

    /// The draft of the document `location` belongs to.
    pub fn draft_of(&self, location: &SchemaLocation) -> Draft {
        self.documents
            .get(location.document_uri())
            .map(|d| d.draft)
            .unwrap_or_else(|| self.config.default_draft.resolve(Draft::Draft6))
    }

    /// Number of documents registered so far.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Freeze the arena into a [`SchemaGraph`] rooted at `root`. Reference
    /// loops that never descend into the instance are recorded in `report`.
    pub fn finish(
        self,
        root: SchemaId,
        report: &mut LoadingReport,
    ) -> Result<SchemaGraph, SchemaError> {
        let mut nodes = Vec::with_capacity(self.slots.len());
        for slot in self.slots {
            match slot {
                Slot::Filled(schema) => nodes.push(schema),
                Slot::Reserved(location) => {
                    return Err(SchemaError::InvalidSchema {
                        location,
                        reason: "schema node was never completed".to_string(),
                    })
                }
            }
        }
        for index in reference_cycle_entries(&nodes) {
            report.log_reference_cycle(nodes[index].location());
        }
        tracing::debug!(
            nodes = nodes.len(),
            documents = self.documents.len(),
            "schema graph complete"
        );
        Ok(SchemaGraph::new(nodes, root))
    }

    fn register_document(
        &mut self,
        uri: Url,
        root: Value,
        inherited: Option<Draft>,
    ) -> Rc<Document> {
        let uri = without_fragment(uri);
        if let Some(doc) = self.documents.get(&uri) {
            return Rc::clone(doc);
        }
        let draft = Draft::detect(&root).resolve(inherited.unwrap_or(self.config.default_draft));
        tracing::debug!(uri = %uri, draft = %draft, "registering schema document");

        let mut found = Vec::new();
        collect_identifiers(
            &root,
            SchemaLocation::document_root(uri.clone()),
            draft,
            true,
            &mut found,
        );
        for (identifier, path) in found {
            self.identifiers
                .entry(identifier)
                .or_insert_with(|| (uri.clone(), path));
        }

        let doc = Rc::new(Document {
            uri: uri.clone(),
            root,
            draft,
        });
        self.documents.insert(uri, Rc::clone(&doc));
        doc
    }

    fn locate(
        &mut self,
        target: &Url,
        referrer: &SchemaLocation,
        reference: &str,
    ) -> Result<(Rc<Document>, JsonPath), SchemaError> {
        let base = without_fragment(target.clone());
        let (doc, base_path) = self.document_for(&base, referrer, reference)?;

        let fragment = target.fragment().unwrap_or("");
        if fragment.is_empty() {
            return Ok((doc, base_path));
        }
        if fragment.starts_with('/') {
            let full = base_path.concat(&JsonPath::parse_fragment(fragment)?);
            return match full.normalize(&doc.root) {
                Some(path) => Ok((doc, path)),
                None => Err(SchemaError::unresolvable(
                    referrer,
                    reference,
                    missing_key(&doc, &full).to_string(),
                )),
            };
        }

        let found = self
            .identifiers
            .get(target.as_str())
            .and_then(|(uri, path)| Some((Rc::clone(self.documents.get(uri)?), path.clone())));
        found.ok_or_else(|| {
            SchemaError::unresolvable(
                referrer,
                reference,
                format!("no schema declares the identifier '{target}'"),
            )
        })
    }

    fn document_for(
        &mut self,
        base: &Url,
        referrer: &SchemaLocation,
        reference: &str,
    ) -> Result<(Rc<Document>, JsonPath), SchemaError> {
        if let Some(doc) = self.documents.get(base) {
            return Ok((Rc::clone(doc), JsonPath::root()));
        }
        if let Some((uri, path)) = self.identifiers.get(base.as_str()) {
            if let Some(doc) = self.documents.get(uri) {
                return Ok((Rc::clone(doc), path.clone()));
            }
        }

        if !self.config.allow_remote {
            return Err(SchemaError::unresolvable(
                referrer,
                reference,
                format!("'{base}' is not a loaded document and fetching is disabled"),
            ));
        }
        tracing::debug!(uri = %base, "fetching referenced document");
        let document = self.fetcher.fetch(base).map_err(|source| SchemaError::Fetch {
            uri: base.to_string(),
            source,
        })?;
        let inherited = self.draft_of(referrer);
        Ok((
            self.register_document(base.clone(), document, Some(inherited)),
            JsonPath::root(),
        ))
    }

    fn reserve(&mut self, key: String, location: &SchemaLocation) -> SchemaId {
        let id = SchemaId::new(self.slots.len());
        self.slots.push(Slot::Reserved(location.clone()));
        self.cache.insert(key, id);
        id
    }

    fn fill(&mut self, id: SchemaId, schema: Schema) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            *slot = Slot::Filled(schema);
        }
    }
}

/// The `id`/`$id` a schema object declares. Ignored beside `$ref`.
fn declared_identifier(value: &Value, draft: Draft) -> Option<&str> {
    let map = value.as_object()?;
    if map.contains_key("$ref") {
        return None;
    }
    map.get(draft.id_keyword())?.as_str()
}

/// The location of the node at `path`, with every identifier declared on
/// the way down applied to the scope.
fn location_at(doc: &Document, path: &JsonPath) -> Result<SchemaLocation, SchemaError> {
    let mut location = SchemaLocation::document_root(doc.uri.clone());
    let mut current = &doc.root;
    for token in path.tokens() {
        if let Some(identifier) = declared_identifier(current, doc.draft) {
            location = location.rescoped(identifier)?;
        }
        let Some(next) = token.select(current) else {
            break;
        };
        current = next;
        location = location.child([token.clone()]);
    }
    Ok(location)
}

/// A `MissingKey` naming the first token of `path` absent from `doc`.
fn missing_key(doc: &Document, path: &JsonPath) -> SchemaError {
    let mut current = &doc.root;
    let mut reached = JsonPath::root();
    for token in path.tokens() {
        match token.select(current) {
            Some(next) => {
                current = next;
                reached.push(token.clone());
            }
            None => break,
        }
    }
    let key = path
        .tokens()
        .get(reached.len())
        .map(|t| t.as_text())
        .unwrap_or_default();
    let location =
        SchemaLocation::document_root(doc.uri.clone()).child(reached.tokens().to_vec());
    SchemaError::missing_key(&location, &key)
}

fn collect_identifiers(
    value: &Value,
    location: SchemaLocation,
    draft: Draft,
    schema_position: bool,
    out: &mut Vec<(String, JsonPath)>,
) {
    match value {
        Value::Object(map) if schema_position => {
            let location = match declared_identifier(value, draft).map(|id| location.rescoped(id)) {
                Some(Ok(scoped)) => {
                    out.push((
                        scoped.resolution_scope().to_string(),
                        scoped.json_path().clone(),
                    ));
                    scoped
                }
                Some(Err(e)) => {
                    tracing::debug!(error = %e, "skipping unresolvable identifier");
                    location
                }
                None => location,
            };
            for (key, child) in map {
                if DATA_KEYWORDS.contains(&key.as_str()) {
                    continue;
                }
                let nested = !SCHEMA_MAP_KEYWORDS.contains(&key.as_str());
                collect_identifiers(child, location.child([key]), draft, nested, out);
            }
        }
        Value::Object(map) => {
            for (key, child) in map {
                collect_identifiers(child, location.child([key]), draft, true, out);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_identifiers(item, location.child([i]), draft, true, out);
            }
        }
        _ => {}
    }
}

/// Nodes that are re-entered through `$ref` without descending into the
/// instance, such as `{"$ref": "#"}` or two documents that only refer to
/// each other. Each returned index is where such a loop closes.
fn reference_cycle_entries(nodes: &[Schema]) -> Vec<usize> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        Active,
        Done,
    }

    let edges: Vec<Vec<SchemaId>> = nodes
        .iter()
        .map(|n| {
            n.keywords()
                .iter()
                .flat_map(|k| k.same_instance_subschemas())
                .collect()
        })
        .collect();
    let mut marks = vec![Mark::Unvisited; nodes.len()];
    let mut entries = Vec::new();
    for start in 0..nodes.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        let mut stack = vec![(start, 0usize)];
        marks[start] = Mark::Active;
        while let Some((node, next_edge)) = stack.pop() {
            match edges[node].get(next_edge) {
                Some(edge) => {
                    stack.push((node, next_edge + 1));
                    let target = edge.index();
                    match marks.get(target).copied() {
                        Some(Mark::Active) => {
                            if !entries.contains(&target) {
                                entries.push(target);
                            }
                        }
                        Some(Mark::Unvisited) => {
                            marks[target] = Mark::Active;
                            stack.push((target, 0));
                        }
                        Some(Mark::Done) | None => {}
                    }
                }
                None => marks[node] = Mark::Done,
            }
        }
    }
    entries
}
