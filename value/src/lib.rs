// Copyright 2026, The marl developers.
// See the LICENSE file at the top-level directory of this distribution.

//! Variant value tree for the marl markup language.
//!
//! A parsed marl document is a [`Value`]: a dynamically typed tree of nulls,
//! booleans, integers, floats, strings, date-times, timestamps, sequences and
//! mappings. Mappings preserve insertion order and accept any value as a key,
//! not just strings.
//!
//! ```
//! use marl_value::{Mapping, Value};
//!
//! let mut map = Mapping::new();
//! map.insert(Value::from("answer"), Value::Int(42));
//! let doc = Value::Mapping(map);
//! assert_eq!(doc["answer"].as_i64(), Some(42));
//! ```

#![warn(missing_docs, clippy::pedantic)]

mod datetime;
mod index;
mod value;

pub use crate::datetime::{DateTime, Timestamp};
pub use crate::value::{Mapping, Sequence, Value};
