//! # JSON Value Types
//!
//! [`JsonType`] is the type vocabulary of the `type` keyword, and
//! [`JsonTypeSet`] a compact set of them. A numeric instance is classified as
//! `integer` when its fractional part is zero and as `number` otherwise;
//! a set containing `number` also accepts integers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::number::is_integral;

/// One of the seven JSON Schema primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// A number with zero fractional part.
    Integer,
    /// Any number.
    Number,
    /// A string.
    String,
    /// An array.
    Array,
    /// An object.
    Object,
}

/// All types, in declaration order.
pub const ALL_TYPES: [JsonType; 7] = [
    JsonType::Null,
    JsonType::Boolean,
    JsonType::Integer,
    JsonType::Number,
    JsonType::String,
    JsonType::Array,
    JsonType::Object,
];

impl JsonType {
    /// The keyword spelling of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Parse a type name as written in a `type` keyword.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_TYPES.into_iter().find(|t| t.as_str() == name)
    }

    /// Classify a JSON value. Integral numbers report `Integer`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if is_integral(n) => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of [`JsonType`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct JsonTypeSet(u8);

impl JsonTypeSet {
    /// The empty set.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Every type.
    pub fn all() -> Self {
        ALL_TYPES.into_iter().collect()
    }

    /// Add a type.
    pub fn insert(&mut self, ty: JsonType) {
        self.0 |= ty.bit();
    }

    /// A copy with `ty` added.
    pub fn with(mut self, ty: JsonType) -> Self {
        self.insert(ty);
        self
    }

    /// Membership, without integer/number widening.
    pub fn contains(&self, ty: JsonType) -> bool {
        self.0 & ty.bit() != 0
    }

    /// True when `value`'s type is in the set. Integers are accepted by
    /// `number`.
    pub fn accepts(&self, value: &Value) -> bool {
        let ty = JsonType::of(value);
        self.contains(ty) || (ty == JsonType::Integer && self.contains(JsonType::Number))
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// True for the empty set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = JsonType> + '_ {
        ALL_TYPES.into_iter().filter(|t| self.contains(*t))
    }
}

impl FromIterator<JsonType> for JsonTypeSet {
    fn from_iter<I: IntoIterator<Item = JsonType>>(iter: I) -> Self {
        let mut set = Self::empty();
        for ty in iter {
            set.insert(ty);
        }
        set
    }
}

impl fmt::Debug for JsonTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for JsonTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(JsonType::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_values() {
        assert_eq!(JsonType::of(&json!(null)), JsonType::Null);
        assert_eq!(JsonType::of(&json!(true)), JsonType::Boolean);
        assert_eq!(JsonType::of(&json!(3)), JsonType::Integer);
        assert_eq!(JsonType::of(&json!(3.5)), JsonType::Number);
        assert_eq!(JsonType::of(&json!("s")), JsonType::String);
        assert_eq!(JsonType::of(&json!([])), JsonType::Array);
        assert_eq!(JsonType::of(&json!({})), JsonType::Object);
    }

    #[test]
    fn zero_fraction_counts_as_integer() {
        let value: Value = serde_json::from_str("4.0").unwrap();
        assert_eq!(JsonType::of(&value), JsonType::Integer);
    }

    #[test]
    fn number_accepts_integers_but_not_vice_versa() {
        let numbers = JsonTypeSet::empty().with(JsonType::Number);
        let integers = JsonTypeSet::empty().with(JsonType::Integer);
        assert!(numbers.accepts(&json!(3)));
        assert!(numbers.accepts(&json!(3.5)));
        assert!(integers.accepts(&json!(3)));
        assert!(!integers.accepts(&json!(3.5)));
    }

    #[test]
    fn set_iterates_in_declaration_order() {
        let set: JsonTypeSet = [JsonType::Object, JsonType::Null].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![JsonType::Null, JsonType::Object]);
        assert_eq!(set.to_string(), "[null, object]");
        assert_eq!(JsonTypeSet::all().len(), 7);
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert_eq!(JsonType::from_name("integer"), Some(JsonType::Integer));
        assert_eq!(JsonType::from_name("any"), None);
    }
}
