//! # JSON Pointer Paths
//!
//! [`JsonPath`] is an ordered sequence of [`PathToken`]s from a document
//! root to a node. It renders to an RFC 6901 JSON Pointer (`/a/0/b`) and to
//! the URI fragment form (`#/a/0/b`), and parses back from either.
//!
//! Parsed pointers cannot tell `"0"` the key from `0` the index, so parsing
//! yields key tokens only. [`JsonPath::normalize`] walks a document and turns
//! keys that land on arrays into index tokens, which is what callers should
//! do before comparing a parsed path with one built by walking.

use std::fmt;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LocationError;

/// A single step in a [`JsonPath`]: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathToken {
    /// Array element position.
    Index(usize),
    /// Object member name.
    Key(String),
}

impl PathToken {
    /// The unescaped text of this token.
    pub fn as_text(&self) -> String {
        match self {
            Self::Index(i) => i.to_string(),
            Self::Key(k) => k.clone(),
        }
    }

    /// The member or element this token addresses inside `value`.
    pub fn select<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        match value {
            Value::Object(map) => map.get(&self.as_text()),
            Value::Array(items) => items.get(array_index(self)?),
            _ => None,
        }
    }

    /// The token escaped for use inside a JSON Pointer (`~` → `~0`, `/` → `~1`).
    pub fn escaped(&self) -> String {
        match self {
            Self::Index(i) => i.to_string(),
            Self::Key(k) => k.replace('~', "~0").replace('/', "~1"),
        }
    }
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => f.write_str(k),
        }
    }
}

impl From<usize> for PathToken {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for PathToken {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathToken {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<&String> for PathToken {
    fn from(key: &String) -> Self {
        Self::Key(key.clone())
    }
}

/// Ordered tokens from a document root to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPath(Vec<PathToken>);

impl JsonPath {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from any sequence of tokens.
    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PathToken>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    /// The tokens of this path, root first.
    pub fn tokens(&self) -> &[PathToken] {
        &self.0
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The final token, if any.
    pub fn last(&self) -> Option<&PathToken> {
        self.0.last()
    }

    /// Append a token in place.
    pub fn push(&mut self, token: impl Into<PathToken>) {
        self.0.push(token.into());
    }

    /// A new path one token deeper.
    pub fn child(&self, token: impl Into<PathToken>) -> Self {
        let mut next = self.clone();
        next.push(token);
        next
    }

    /// A new path with every token of `other` appended, in order.
    pub fn concat(&self, other: &JsonPath) -> Self {
        let mut next = self.clone();
        next.0.extend(other.0.iter().cloned());
        next
    }

    /// Render as an RFC 6901 JSON Pointer. The root renders as `""`.
    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for token in &self.0 {
            out.push('/');
            out.push_str(&token.escaped());
        }
        out
    }

    /// Render as a URI fragment, `#` followed by the JSON Pointer.
    pub fn to_fragment(&self) -> String {
        format!("#{}", self.to_pointer())
    }

    /// Parse an RFC 6901 JSON Pointer. Every token is read as a key; see
    /// [`JsonPath::normalize`] for turning array positions into indices.
    pub fn parse_pointer(pointer: &str) -> Result<Self, LocationError> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = pointer.strip_prefix('/') else {
            return Err(LocationError::MalformedPointer {
                pointer: pointer.to_string(),
                reason: "a non-empty pointer must start with '/'".to_string(),
            });
        };
        let mut tokens = Vec::new();
        for raw in rest.split('/') {
            tokens.push(PathToken::Key(unescape_token(pointer, raw)?));
        }
        Ok(Self(tokens))
    }

    /// Parse the fragment part of a URI (without the leading `#`) as a JSON
    /// Pointer, percent-decoding it first.
    pub fn parse_fragment(fragment: &str) -> Result<Self, LocationError> {
        let decoded = percent_decode_str(fragment)
            .decode_utf8()
            .map_err(|e| LocationError::MalformedPointer {
                pointer: fragment.to_string(),
                reason: format!("fragment is not valid UTF-8 after percent-decoding: {e}"),
            })?;
        Self::parse_pointer(&decoded)
    }

    /// Navigate `root` along this path.
    pub fn resolve<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        let mut current = root;
        for token in &self.0 {
            current = token.select(current)?;
        }
        Some(current)
    }

    /// Walk `root` along this path and return the same path with every token
    /// that addresses an array element rewritten as an index. Returns `None`
    /// when the path does not exist in `root`.
    pub fn normalize(&self, root: &Value) -> Option<Self> {
        let mut current = root;
        let mut tokens = Vec::with_capacity(self.0.len());
        for token in &self.0 {
            let normalized = match current {
                Value::Array(_) => PathToken::Index(array_index(token)?),
                _ => PathToken::Key(token.as_text()),
            };
            current = normalized.select(current)?;
            tokens.push(normalized);
        }
        Some(Self(tokens))
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

impl<T: Into<PathToken>> FromIterator<T> for JsonPath {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_tokens(iter)
    }
}

/// Array positions must be plain decimal without leading zeros.
fn array_index(token: &PathToken) -> Option<usize> {
    match token {
        PathToken::Index(i) => Some(*i),
        PathToken::Key(k) => {
            let index: usize = k.parse().ok()?;
            (index.to_string() == *k).then_some(index)
        }
    }
}

fn unescape_token(pointer: &str, raw: &str) -> Result<String, LocationError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            other => {
                return Err(LocationError::MalformedPointer {
                    pointer: pointer.to_string(),
                    reason: format!(
                        "'~' must be followed by '0' or '1', found {}",
                        other.map_or_else(|| "end of token".to_string(), |c| format!("'{c}'"))
                    ),
                })
            }
        }
    }
    Ok(out)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn token() -> impl Strategy<Value = PathToken> {
        prop_oneof![
            (0usize..1000).prop_map(PathToken::Index),
            "[a-z~/0-9]{0,8}".prop_map(PathToken::Key),
        ]
    }

    proptest! {
        /// Rendering then parsing preserves every token's text.
        #[test]
        fn pointer_text_round_trips(tokens in prop::collection::vec(token(), 0..8)) {
            let path = JsonPath::from_tokens(tokens.clone());
            let parsed = JsonPath::parse_pointer(&path.to_pointer()).unwrap();
            let expected: Vec<String> = tokens.iter().map(PathToken::as_text).collect();
            let actual: Vec<String> = parsed.tokens().iter().map(PathToken::as_text).collect();
            prop_assert_eq!(expected, actual);
        }

        /// Concatenation keeps both halves in order.
        #[test]
        fn concat_preserves_order(
            a in prop::collection::vec(token(), 0..6),
            b in prop::collection::vec(token(), 0..6),
        ) {
            let joined = JsonPath::from_tokens(a.clone()).concat(&JsonPath::from_tokens(b.clone()));
            let mut expected = a;
            expected.extend(b);
            prop_assert_eq!(joined.tokens(), expected.as_slice());
        }
    }
}
