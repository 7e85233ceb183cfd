// Copyright 2026, The marl developers.
// See the LICENSE file at the top-level directory of this distribution.

//! marl: an indentation-sensitive markup with JSON islands.
//!
//! Block mode gives YAML-flavored lists, maps and multi-line strings;
//! inline mode is pure JSON (plus `#` comments); conversion specifiers
//! (`:name:`) bridge the two and add date-times, timestamps and raw,
//! literal and folded string blocks.
//!
//! # Examples
//! Parse a document and serialize it back in canonical block form:
//!
//! ```
//! use marl::{parse_str, Emitter};
//!
//! let doc = parse_str("name: marl\ntags:\n  - markup\n  - parser\n").unwrap();
//! assert_eq!(doc["tags"][0].as_str(), Some("markup"));
//!
//! let mut out = String::new();
//! Emitter::new(&mut out).dump(&doc).unwrap();
//! assert_eq!(parse_str(&out).unwrap(), doc);
//! ```

#![warn(missing_docs, clippy::pedantic)]

mod emitter;

pub use crate::emitter::{EmitError, EmitResult, Emitter};

pub use marl_parser::{
    parse, parse_json, parse_json_str, parse_str, BlockParserFn, Error, LineInput, ParseError,
    Parser, ReaderInput, Result, StrInput, MAX_JSON_DEPTH, MAX_NESTED_BLOCKS,
};
pub use marl_value::{DateTime, Mapping, Sequence, Timestamp, Value};
