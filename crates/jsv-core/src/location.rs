//! # Schema Locations
//!
//! A [`SchemaLocation`] says where a schema node lives: the document it was
//! loaded from, the JSON path from that document's root, and the resolution
//! scope in effect for relative references at that point.
//!
//! ## Invariants
//!
//! - Equality and hashing consider exactly the three stored fields.
//! - [`SchemaLocation::unique_uri`] is computed from the stored fields on
//!   every call; it is never cached and never part of equality.
//! - A fragment set by a plain-name identifier (`"id": "#foo"`) names only
//!   the node that declares it. Children inherit the scope without it.
//! - Descending with [`SchemaLocation::child`] never changes the document
//!   URI and only extends the JSON path.

use std::fmt;

use url::Url;
use uuid::Uuid;

use crate::error::LocationError;
use crate::pointer::{JsonPath, PathToken};

/// URI authority used for documents supplied without a URI.
const ANONYMOUS_AUTHORITY: &str = "jsv://anonymous";

/// Immutable (document URI, JSON path, resolution scope) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaLocation {
    document_uri: Url,
    json_path: JsonPath,
    resolution_scope: Url,
}

impl SchemaLocation {
    /// Location of the root of the document at `document_uri`. Any fragment
    /// on the URI is dropped; the scope starts out equal to the document URI.
    pub fn document_root(document_uri: Url) -> Self {
        let document_uri = without_fragment(document_uri);
        Self {
            resolution_scope: document_uri.clone(),
            document_uri,
            json_path: JsonPath::root(),
        }
    }

    /// Location of the root of a document given as URI text.
    pub fn parse_root(document_uri: &str) -> Result<Self, LocationError> {
        let uri = Url::parse(document_uri).map_err(|e| LocationError::InvalidUri {
            uri: document_uri.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::document_root(uri))
    }

    /// Root location for a document supplied without a URI. Each call mints
    /// a fresh URI, so two anonymous documents never collide in a cache.
    pub fn anonymous_root() -> Result<Self, LocationError> {
        Self::parse_root(&format!("{ANONYMOUS_AUTHORITY}/{}", Uuid::new_v4()))
    }

    /// True when this location belongs to a document minted by
    /// [`SchemaLocation::anonymous_root`].
    pub fn is_anonymous(&self) -> bool {
        self.document_uri.as_str().starts_with(ANONYMOUS_AUTHORITY)
    }

    /// The absolute URI of the document this node was loaded from.
    pub fn document_uri(&self) -> &Url {
        &self.document_uri
    }

    /// Tokens from the document root to this node.
    pub fn json_path(&self) -> &JsonPath {
        &self.json_path
    }

    /// The URI currently used as the base for relative references.
    pub fn resolution_scope(&self) -> &Url {
        &self.resolution_scope
    }

    /// A location `tokens` deeper in the same document. The scope is
    /// inherited from this location, minus any plain-name fragment.
    pub fn child<I, T>(&self, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PathToken>,
    {
        let mut json_path = self.json_path.clone();
        for token in tokens {
            json_path.push(token);
        }
        Self {
            document_uri: self.document_uri.clone(),
            json_path,
            resolution_scope: without_fragment(self.resolution_scope.clone()),
        }
    }

    /// Like [`SchemaLocation::child`], then re-scoped by `segment` when one
    /// is given (an `id`/`$id` value met at the child).
    pub fn child_with_segment<I, T>(
        &self,
        segment: Option<&str>,
        tokens: I,
    ) -> Result<Self, LocationError>
    where
        I: IntoIterator<Item = T>,
        T: Into<PathToken>,
    {
        let child = self.child(tokens);
        match segment {
            Some(segment) => child.rescoped(segment),
            None => Ok(child),
        }
    }

    /// This location with its resolution scope updated by an identifier.
    ///
    /// The identifier is resolved against the current scope with standard
    /// URI-reference rules. A fragment-only identifier keeps the base and
    /// only sets a named fragment.
    pub fn rescoped(&self, identifier: &str) -> Result<Self, LocationError> {
        let scope = self.resolve(identifier)?;
        Ok(Self {
            document_uri: self.document_uri.clone(),
            json_path: self.json_path.clone(),
            resolution_scope: drop_empty_fragment(scope),
        })
    }

    /// Resolve a URI reference (absolute, relative or fragment-only) against
    /// the current resolution scope.
    pub fn resolve(&self, reference: &str) -> Result<Url, LocationError> {
        self.resolution_scope
            .join(reference)
            .map_err(|e| LocationError::Unresolvable {
                reference: reference.to_string(),
                base: self.resolution_scope.to_string(),
                reason: e.to_string(),
            })
    }

    /// The JSON path rendered as a URI fragment, e.g. `#/a/b/c`.
    pub fn json_pointer_fragment(&self) -> String {
        self.json_path.to_fragment()
    }

    /// The URI that identifies this node: the resolution scope itself when
    /// it carries a fragment of its own, otherwise the scope with the JSON
    /// Pointer fragment of this node's path.
    pub fn unique_uri(&self) -> Url {
        if has_fragment(&self.resolution_scope) {
            return self.resolution_scope.clone();
        }
        let mut uri = self.resolution_scope.clone();
        if self.json_path.is_empty() {
            uri.set_fragment(None);
        } else {
            uri.set_fragment(Some(&self.json_path.to_pointer()));
        }
        uri
    }

    /// Cache key naming this node by document and path alone. Two locations
    /// reached along different routes (tree walk or `$ref`) share a key
    /// exactly when they address the same node of the same document.
    pub fn canonical_key(&self) -> String {
        Self::key_for(&self.document_uri, &self.json_path)
    }

    /// The [`SchemaLocation::canonical_key`] a node at `json_path` in
    /// `document_uri` would have.
    pub fn key_for(document_uri: &Url, json_path: &JsonPath) -> String {
        format!("{}{}", document_uri, json_path.to_fragment())
    }
}

impl fmt::Display for SchemaLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unique_uri())
    }
}

/// `uri` with its fragment removed.
pub fn without_fragment(mut uri: Url) -> Url {
    uri.set_fragment(None);
    uri
}

fn has_fragment(uri: &Url) -> bool {
    uri.fragment().is_some_and(|f| !f.is_empty())
}

fn drop_empty_fragment(uri: Url) -> Url {
    if uri.fragment() == Some("") {
        without_fragment(uri)
    } else {
        uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(uri: &str) -> SchemaLocation {
        SchemaLocation::parse_root(uri).unwrap()
    }

    #[test]
    fn document_root_drops_fragment() {
        let loc = root("http://example.com/schema.json#/definitions");
        assert_eq!(loc.document_uri().as_str(), "http://example.com/schema.json");
        assert!(loc.json_path().is_empty());
        assert_eq!(loc.unique_uri().as_str(), "http://example.com/schema.json");
    }

    #[test]
    fn child_extends_path_and_keeps_scope() {
        let loc = root("http://example.com/schema.json").child(["properties", "name"]);
        assert_eq!(loc.json_pointer_fragment(), "#/properties/name");
        assert_eq!(loc.resolution_scope().as_str(), "http://example.com/schema.json");
        assert_eq!(
            loc.unique_uri().as_str(),
            "http://example.com/schema.json#/properties/name"
        );
    }

    #[test]
    fn pointer_only_fragment_does_not_change_scope() {
        let loc = root("http://example.com/schema.json");
        let child = loc.child(JsonPath::parse_pointer("/a/b").unwrap().tokens().to_vec());
        assert_eq!(child.resolution_scope(), loc.resolution_scope());
        assert_eq!(child.document_uri(), loc.document_uri());
        assert_eq!(child.json_path().len(), 2);
    }

    #[test]
    fn absolute_identifier_replaces_scope() {
        let loc = root("http://example.com/root.json")
            .child_with_segment(Some("http://other.org/item.json"), ["items"])
            .unwrap();
        assert_eq!(loc.resolution_scope().as_str(), "http://other.org/item.json");
        assert_eq!(loc.document_uri().as_str(), "http://example.com/root.json");
    }

    #[test]
    fn relative_identifier_resolves_against_scope() {
        let loc = root("http://example.com/dir/root.json")
            .child_with_segment(Some("folder/"), ["items"])
            .unwrap();
        assert_eq!(loc.resolution_scope().as_str(), "http://example.com/dir/folder/");
        assert_eq!(
            loc.resolve("item.json").unwrap().as_str(),
            "http://example.com/dir/folder/item.json"
        );
    }

    #[test]
    fn plain_name_fragment_names_only_the_declaring_node() {
        let loc = root("http://example.com/root.json")
            .child(["definitions", "a"])
            .rescoped("#foo")
            .unwrap();
        assert_eq!(loc.unique_uri().as_str(), "http://example.com/root.json#foo");

        let nested = loc.child(["properties", "x"]);
        assert_eq!(nested.resolution_scope().as_str(), "http://example.com/root.json");
        assert_eq!(
            nested.unique_uri().as_str(),
            "http://example.com/root.json#/definitions/a/properties/x"
        );
    }

    #[test]
    fn equality_uses_all_three_fields() {
        let a = root("http://example.com/root.json").child(["a"]);
        let b = root("http://example.com/root.json").child(["a"]);
        let rescoped = a.rescoped("http://example.com/other.json").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, rescoped);
        assert_eq!(a.canonical_key(), rescoped.canonical_key());
    }

    #[test]
    fn anonymous_roots_are_unique() {
        let a = SchemaLocation::anonymous_root().unwrap();
        let b = SchemaLocation::anonymous_root().unwrap();
        assert_ne!(a, b);
        assert!(a.is_anonymous());
        assert!(!root("http://example.com/x.json").is_anonymous());
    }

    #[test]
    fn fragment_resolves_against_anonymous_base() {
        let loc = SchemaLocation::anonymous_root().unwrap();
        assert!(loc.resolve("#/definitions/a").is_ok());
    }

    #[test]
    fn parse_root_rejects_relative_uri() {
        assert!(matches!(
            SchemaLocation::parse_root("schema.json"),
            Err(LocationError::InvalidUri { .. })
        ));
    }
}
