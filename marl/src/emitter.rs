//! Canonical block-form serialization.

use std::error::Error;
use std::fmt::{self, Display, Write};

use marl_value::Value;

/// A convenience alias for emitter operations that may fail.
pub type EmitResult = std::result::Result<(), EmitError>;

/// An error when emitting a value.
#[derive(Copy, Clone, Debug)]
pub enum EmitError {
    /// A formatting error from the underlying writer.
    Fmt(fmt::Error),
    /// A mapping key that the block form cannot express (a container, a
    /// date-time or a timestamp).
    KeyNotScalar,
    /// An infinite or NaN float; the grammar has no literal for these.
    NonFiniteFloat,
}

impl Error for EmitError {}

impl Display for EmitError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EmitError::Fmt(ref err) => Display::fmt(err, formatter),
            EmitError::KeyNotScalar => formatter.write_str("map key is not an emittable scalar"),
            EmitError::NonFiniteFloat => formatter.write_str("non-finite float has no block form"),
        }
    }
}

impl From<fmt::Error> for EmitError {
    fn from(err: fmt::Error) -> Self {
        EmitError::Fmt(err)
    }
}

/// The marl serializer.
///
/// Produces the canonical block form: maps and lists in block mode with
/// two-space child indentation, strings plain where the grammar reads them
/// back verbatim and double-quoted otherwise, date-times and timestamps
/// through their conversion specifiers, and empty containers as JSON
/// islands (the only block-form spelling the grammar has for them).
///
/// ```
/// # use marl::{Emitter, Value};
/// let doc = Value::Sequence(vec![Value::Int(1), Value::from("two")]);
/// let mut out = String::new();
/// Emitter::new(&mut out).dump(&doc).unwrap();
/// assert_eq!(out, "- 1\n- two\n");
/// ```
pub struct Emitter<'a> {
    writer: &'a mut dyn Write,
}

impl<'a> Emitter<'a> {
    /// Create a new emitter serializing into `writer`.
    pub fn new(writer: &'a mut dyn Write) -> Self {
        Emitter { writer }
    }

    /// Write `value` as a complete document.
    ///
    /// # Errors
    /// Returns [`EmitError`] when the value contains something the block
    /// form cannot express or the writer fails.
    pub fn dump(&mut self, value: &Value) -> EmitResult {
        self.emit_node(value, 0)
    }

    /// Emit one node starting on a fresh line at `indent`.
    fn emit_node(&mut self, value: &Value, indent: usize) -> EmitResult {
        if let Some(scalar) = scalar_text(value)? {
            writeln!(self.writer, "{:indent$}{scalar}", "")?;
            return Ok(());
        }
        match value {
            Value::Sequence(items) => {
                for item in items {
                    match scalar_text(item)? {
                        Some(scalar) => writeln!(self.writer, "{:indent$}- {scalar}", "")?,
                        None => {
                            writeln!(self.writer, "{:indent$}-", "")?;
                            self.emit_node(item, indent + 2)?;
                        }
                    }
                }
                Ok(())
            }
            Value::Mapping(members) => {
                for (key, value) in members {
                    let key = key_text(key)?;
                    match scalar_text(value)? {
                        Some(scalar) => writeln!(self.writer, "{:indent$}{key}: {scalar}", "")?,
                        None => {
                            writeln!(self.writer, "{:indent$}{key}:", "")?;
                            self.emit_node(value, indent + 2)?;
                        }
                    }
                }
                Ok(())
            }
            _ => unreachable!("scalar_text covers every leaf"),
        }
    }
}

/// The inline spelling of `value`, or `None` for non-empty containers,
/// which only exist in block form.
fn scalar_text(value: &Value) -> std::result::Result<Option<String>, EmitError> {
    Ok(Some(match value {
        Value::Null => "null".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Int(n) => n.to_string(),
        Value::UInt(n) => n.to_string(),
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(EmitError::NonFiniteFloat);
            }
            // Debug formatting always keeps a fractional part or an
            // exponent, so the text reads back as a float.
            format!("{:?}", f.into_inner())
        }
        Value::String(s) => {
            if is_plain(s) {
                s.clone()
            } else {
                quoted(s)
            }
        }
        Value::DateTime(dt) => format!(":datetime: {dt}"),
        Value::Timestamp(ts) => format!(":timestamp: {ts}"),
        Value::Sequence(items) if items.is_empty() => ":json: []".to_string(),
        Value::Mapping(members) if members.is_empty() => ":json: {}".to_string(),
        Value::Sequence(_) | Value::Mapping(_) => return Ok(None),
    }))
}

/// The spelling of `key` in key position, where conversion specifiers are
/// not available.
fn key_text(key: &Value) -> std::result::Result<String, EmitError> {
    match key {
        Value::DateTime(_) | Value::Timestamp(_) | Value::Sequence(_) | Value::Mapping(_) => {
            Err(EmitError::KeyNotScalar)
        }
        _ => match scalar_text(key)? {
            Some(text) => Ok(text),
            None => Err(EmitError::KeyNotScalar),
        },
    }
}

/// Whether the string reads back verbatim when emitted bare.
///
/// Anything that could be taken for another production is quoted instead:
/// a leading quote, dash, colon, comment sign, sign or digit; a colon or
/// comment sign anywhere (a `: ` would open a map); control characters;
/// surrounding whitespace, which indentation handling would swallow; and
/// the three keywords.
fn is_plain(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    if first.is_whitespace() || first.is_ascii_digit() {
        return false;
    }
    if matches!(first, '-' | ':' | '"' | '\'' | '#' | '+') {
        return false;
    }
    if s.ends_with(char::is_whitespace) {
        return false;
    }
    if s.chars().any(|c| matches!(c, ':' | '#') || c.is_control()) {
        return false;
    }
    // Keyword matching is by length, not by word: "nullable" would parse
    // as `null` followed by garbage.
    !(s.starts_with("null") || s.starts_with("true") || s.starts_with("false"))
}

/// Double-quote `s`, escaping what the single-line form cannot carry.
fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            // `\\` right before the closing quote would read as an escaped
            // quote; spell the backslash out instead
            '\\' if chars.peek().is_none() => out.push_str("\\u005c"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
