//! The `Value` enumeration and its conversion surface.

use std::hash::{Hash, Hasher};

use hashlink::LinkedHashMap;
use ordered_float::OrderedFloat;

use crate::{DateTime, Timestamp};

/// The type contained in the [`Value::Sequence`] variant.
pub type Sequence = Vec<Value>;

/// The type contained in the [`Value::Mapping`] variant.
///
/// Iteration order matches insertion order. Keys are full [`Value`]s: any
/// hashable value the parser can produce may act as a key.
pub type Mapping = LinkedHashMap<Value, Value>;

/// A node of a parsed marl document.
///
/// `Value` is `Eq + Hash` so that it can itself be used as a mapping key.
/// Floats take part through [`OrderedFloat`], which makes `NaN` equal to
/// itself.
#[derive(Clone, Debug)]
pub enum Value {
    /// The `null` keyword.
    Null,
    /// The `true` and `false` keywords.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer that does not fit in [`Value::Int`].
    ///
    /// Numerically equal `Int`/`UInt` values compare equal and hash alike;
    /// see the `PartialEq` implementation.
    UInt(u64),
    /// A floating point number.
    Float(OrderedFloat<f64>),
    /// A string.
    String(String),
    /// A calendar date-time, produced by the `:datetime:` specifier.
    DateTime(DateTime),
    /// An epoch timestamp, produced by the `:timestamp:` specifier.
    Timestamp(Timestamp),
    /// An ordered sequence of values.
    Sequence(Sequence),
    /// An insertion-ordered mapping from values to values.
    Mapping(Mapping),
}

impl Value {
    /// Return whether the value is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Return whether the value is a boolean.
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Return whether the value is an integer, signed or unsigned.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_))
    }

    /// Return whether the value is a float.
    #[must_use]
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Return whether the value is a string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Return whether the value is a sequence.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Return whether the value is a mapping.
    #[must_use]
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Get the boolean if the value is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as an `i64` if it is an integer in range.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::UInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Get the value as a `u64` if it is a non-negative integer.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(n) => Some(*n),
            Value::Int(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Get the float if the value is one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(f.into_inner()),
            _ => None,
        }
    }

    /// Get a string slice if the value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the date-time if the value is one.
    #[must_use]
    pub fn as_datetime(&self) -> Option<&DateTime> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Get the timestamp if the value is one.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Get the sequence if the value is one.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Get the sequence mutably if the value is one.
    #[must_use]
    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Get the mapping if the value is one.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Get the mapping mutably if the value is one.
    #[must_use]
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Take the string out of the value if it is one.
    #[must_use]
    pub fn into_string(self) -> Option<String> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Take the sequence out of the value if it is one.
    #[must_use]
    pub fn into_sequence(self) -> Option<Sequence> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Take the mapping out of the value if it is one.
    #[must_use]
    pub fn into_mapping(self) -> Option<Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // The parser re-reads any unsigned value that fits as signed, so
            // numerically equal integers must compare equal across variants.
            (Value::Int(a), Value::UInt(b)) | (Value::UInt(b), Value::Int(a)) => {
                u64::try_from(*a) == Ok(*b)
            }
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Mapping(a), Value::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Int and UInt hash through i128 so that cross-variant equal keys
        // land in the same bucket.
        match self {
            Value::Null => state.write_u8(0),
            Value::Bool(b) => {
                state.write_u8(1);
                b.hash(state);
            }
            Value::Int(n) => {
                state.write_u8(2);
                i128::from(*n).hash(state);
            }
            Value::UInt(n) => {
                state.write_u8(2);
                i128::from(*n).hash(state);
            }
            Value::Float(f) => {
                state.write_u8(3);
                f.hash(state);
            }
            Value::String(s) => {
                state.write_u8(4);
                s.hash(state);
            }
            Value::DateTime(dt) => {
                state.write_u8(5);
                dt.hash(state);
            }
            Value::Timestamp(ts) => {
                state.write_u8(6);
                ts.hash(state);
            }
            Value::Sequence(seq) => {
                state.write_u8(7);
                seq.hash(state);
            }
            Value::Mapping(map) => {
                state.write_u8(8);
                state.write_usize(map.len());
                for (key, value) in map {
                    key.hash(state);
                    value.hash(state);
                }
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::UInt(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(OrderedFloat(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime> for Value {
    fn from(dt: DateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<Sequence> for Value {
    fn from(seq: Sequence) -> Self {
        Value::Sequence(seq)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Sequence(iter.into_iter().collect())
    }
}

impl FromIterator<(Value, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Value::Mapping(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::*;

    fn hash_of(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn mixed_integer_equality() {
        assert_eq!(Value::Int(5), Value::UInt(5));
        assert_eq!(hash_of(&Value::Int(5)), hash_of(&Value::UInt(5)));
        assert_ne!(Value::Int(-1), Value::UInt(u64::MAX));
        assert_ne!(Value::Int(5), Value::Float(OrderedFloat(5.0)));
    }

    #[test]
    fn mixed_integer_map_keys() {
        let mut map = Mapping::new();
        map.insert(Value::UInt(7), Value::from("seven"));
        assert_eq!(map.get(&Value::Int(7)).and_then(Value::as_str), Some("seven"));
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from(3i64).as_i64(), Some(3));
        assert_eq!(Value::UInt(3).as_i64(), Some(3));
        assert_eq!(Value::UInt(u64::MAX).as_i64(), None);
        assert_eq!(Value::Int(-2).as_u64(), None);
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert!(Value::Null.is_null());
        assert!(!Value::Bool(false).is_null());
    }
}
