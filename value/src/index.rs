//! Indexing into sequences and mappings.

use std::ops::Index;

use crate::Value;

static NULL: Value = Value::Null;

impl Value {
    /// Look up a mapping entry by string key.
    ///
    /// Returns `None` if the value is not a mapping or has no such key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(map) => map.get(&Value::from(key)),
            _ => None,
        }
    }

    /// Look up a sequence element by position.
    ///
    /// Returns `None` if the value is not a sequence or the index is out of
    /// bounds.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Sequence(seq) => seq.get(index),
            _ => None,
        }
    }
}

/// `value["key"]` sugar over [`Value::get`].
///
/// Indexing a non-mapping or a missing key yields [`Value::Null`] rather
/// than panicking, which keeps chained lookups terse in tests and consumers.
impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

/// `value[0]` sugar over [`Value::get_index`].
impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.get_index(index).unwrap_or(&NULL)
    }
}
