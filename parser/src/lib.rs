// Copyright 2026, The marl developers.
// See the LICENSE file at the top-level directory of this distribution.

//! Parser for the marl markup language.
//!
//! marl is an indentation-sensitive markup. Block mode gives YAML-flavored
//! lists, maps and multi-line strings; inline mode is pure JSON; the two
//! are bridged by conversion specifiers, `:name:` tokens that hand the
//! subordinate block to a named sub-parser. A parsed document is a
//! [`Value`] tree.
//!
//! # Usage
//!
//! ```
//! use marl_parser::parse_str;
//!
//! let doc = parse_str("servers:\n  - alpha\n  - beta\nretries: 3\n").unwrap();
//! assert_eq!(doc["servers"][1].as_str(), Some("beta"));
//! assert_eq!(doc["retries"].as_i64(), Some(3));
//! ```
//!
//! Custom conversion specifiers can be registered on a [`Parser`] before
//! parsing starts; see [`Parser::set_custom_parser`].
//!
//! # JSON islands
//!
//! The `:json:` specifier and [`parse_json`] accept strict JSON with one
//! deliberate extension: `#` comments are whitespace between tokens. This
//! deviates from RFC 8259 and is inherited from the block-mode comment
//! syntax.

#![warn(missing_docs, clippy::pedantic)]

mod datetime;
mod error;
mod escape;
mod input;
mod json;
mod number;
mod parser;

pub use marl_value::{DateTime, Mapping, Sequence, Timestamp, Value};

pub use crate::error::{Error, ParseError, Result};
pub use crate::input::{LineInput, ReaderInput, StrInput};
pub use crate::parser::{BlockParserFn, Parser, MAX_JSON_DEPTH, MAX_NESTED_BLOCKS};

/// Parse `input` as a single block-mode value.
///
/// # Errors
/// Returns [`Error::Eof`] for an input with no value at all, and
/// [`Error::Parse`] for malformed markup.
pub fn parse<I: LineInput>(input: I) -> Result<Value> {
    Parser::new(input).parse_document()
}

/// Parse a string as a single block-mode value.
///
/// # Errors
/// As for [`parse`].
pub fn parse_str(source: &str) -> Result<Value> {
    parse(StrInput::new(source))
}

/// Parse `input` as a JSON value (with `#` comments as whitespace).
///
/// # Errors
/// As for [`parse`].
pub fn parse_json<I: LineInput>(input: I) -> Result<Value> {
    Parser::new(input).parse_json_document()
}

/// Parse a string as a JSON value (with `#` comments as whitespace).
///
/// # Errors
/// As for [`parse`].
pub fn parse_json_str(source: &str) -> Result<Value> {
    parse_json(StrInput::new(source))
}
