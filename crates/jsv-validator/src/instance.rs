//! # Path-Aware Instances
//!
//! A borrowed JSON value paired with the path from the instance root to it.
//! Every validation error records the pointer of the value it is about, so
//! the engine hands these down instead of bare `&Value`s.
//!
//! A value also remembers which `$ref` targets have been entered at it.
//! Descending to a member or element starts that list afresh, so a target
//! entered twice at the same value marks a reference loop that would never
//! consume the instance.

use jsv_core::{JsonPath, JsonType, PathToken};
use jsv_schema::SchemaId;
use serde_json::Value;

/// A value inside an instance document, with its location.
#[derive(Debug, Clone)]
pub struct PathAwareValue<'v> {
    value: &'v Value,
    path: JsonPath,
    entered: Vec<SchemaId>,
}

impl<'v> PathAwareValue<'v> {
    /// The root of an instance document.
    pub fn root(value: &'v Value) -> Self {
        Self::at(value, JsonPath::root())
    }

    /// A value at an explicit path.
    pub fn at(value: &'v Value, path: JsonPath) -> Self {
        Self {
            value,
            path,
            entered: Vec::new(),
        }
    }

    pub fn value(&self) -> &'v Value {
        self.value
    }

    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// RFC 6901 pointer to this value; `""` for the root.
    pub fn pointer(&self) -> String {
        self.path.to_pointer()
    }

    pub fn json_type(&self) -> JsonType {
        JsonType::of(self.value)
    }

    /// `value` as the child of this one at `token`.
    pub fn child(&self, token: impl Into<PathToken>, value: &'v Value) -> Self {
        Self::at(value, self.path.child(token))
    }

    /// This value as seen through the `$ref` target `target`, or `None`
    /// when `target` was already entered at this same value.
    pub fn through_reference(&self, target: SchemaId) -> Option<Self> {
        if self.entered.contains(&target) {
            return None;
        }
        let mut next = self.clone();
        next.entered.push(target);
        Some(next)
    }

    /// Array elements with their paths. Empty for non-arrays.
    pub fn elements(&self) -> impl Iterator<Item = PathAwareValue<'v>> + '_ {
        self.value
            .as_array()
            .into_iter()
            .flatten()
            .enumerate()
            .map(move |(i, item)| self.child(i, item))
    }

    /// Object members with their paths, in document order. Empty for
    /// non-objects.
    pub fn members(&self) -> impl Iterator<Item = (&'v str, PathAwareValue<'v>)> + '_ {
        self.value
            .as_object()
            .into_iter()
            .flatten()
            .map(move |(key, value)| (key.as_str(), self.child(key, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn children_extend_the_pointer() {
        let doc = json!({"a": [10, {"b/c": true}]});
        let root = PathAwareValue::root(&doc);
        assert_eq!(root.pointer(), "");

        let (key, a) = root.members().next().unwrap();
        assert_eq!(key, "a");
        let second = a.elements().nth(1).unwrap();
        assert_eq!(second.pointer(), "/a/1");
        let (_, leaf) = second.members().next().unwrap();
        assert_eq!(leaf.pointer(), "/a/1/b~1c");
        assert_eq!(leaf.json_type(), JsonType::Boolean);
    }

    #[test]
    fn reentering_a_reference_needs_a_descent() {
        let graph = jsv_schema::load(&json!({"items": {"$ref": "#"}})).unwrap();
        let target = graph.root();
        let doc = json!([[1]]);
        let root = PathAwareValue::root(&doc);

        let inside = root.through_reference(target).unwrap();
        assert!(inside.through_reference(target).is_none());

        let element = inside.elements().next().unwrap();
        assert!(element.through_reference(target).is_some());
        assert_eq!(element.pointer(), "/0");
    }

    #[test]
    fn scalars_have_no_children() {
        let doc = json!(3);
        let root = PathAwareValue::root(&doc);
        assert_eq!(root.elements().count(), 0);
        assert_eq!(root.members().count(), 0);
        assert_eq!(root.json_type(), JsonType::Integer);
    }
}
