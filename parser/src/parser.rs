//! The block-mode parser.
//!
//! A document is a tree of blocks: contiguous runs of lines sharing a
//! minimum indentation. The parser reads the input through a one-line
//! buffer, walks blocks recursively, and builds the value tree bottom-up.
//! Conversion specifiers (`:name:`) redirect the parsing of a subordinate
//! block to a registered sub-parser; the built-in ones cover raw, literal
//! and folded strings, date-times, timestamps and inline JSON.

use std::collections::HashMap;

use marl_value::{Mapping, Sequence, Value};

use crate::datetime;
use crate::error::{Error, Flow, PResult, ParseError, Result};
use crate::escape::unescape_line;
use crate::input::LineInput;
use crate::json;
use crate::number::{parse_number, BLOCK_TERMINATORS};

/// The comment character. Everything from it to the end of the line is
/// ignored wherever comments are recognized.
pub(crate) const COMMENT: char = '#';

/// Maximum nesting depth of block-mode values.
pub const MAX_NESTED_BLOCKS: u32 = 100;

/// Maximum nesting depth of JSON arrays and objects.
pub const MAX_JSON_DEPTH: u32 = 100;

/// A sub-parser attached to a conversion specifier.
///
/// The function is invoked with the parser positioned on the first line of
/// the block it should consume, and `block_indent` set to that block's
/// indentation. It must consume the block (see [`Parser::block_lines`]) or
/// a prefix of the current line, and return the parsed value.
pub type BlockParserFn<I> = fn(&mut Parser<I>) -> Result<Value>;

/// What [`Parser::parse_value`] produced.
enum Parsed {
    /// A complete value.
    Value(Value),
    /// A map key, with the position of its value on the current line and
    /// the conversion specifier attached to it, if any.
    Key {
        key: Value,
        value_pos: usize,
        convspec: Option<String>,
    },
}

/// Parser state for one document.
///
/// Create one with [`Parser::new`], optionally register conversion
/// specifiers with [`Parser::set_custom_parser`], then call
/// [`Parser::parse_document`] or [`Parser::parse_json_document`].
pub struct Parser<I> {
    input: I,
    /// Current line, right-trimmed of trailing whitespace.
    pub(crate) line: Vec<char>,
    /// Count of leading space characters in `line`.
    pub(crate) current_indent: usize,
    /// 1-based number of `line` in the input.
    pub(crate) line_number: u64,
    /// Minimum indentation required to remain in the current block.
    pub(crate) block_indent: usize,
    blocklevel: u32,
    json_depth: u32,
    skip_comments: bool,
    eof: bool,
    custom_parsers: HashMap<String, BlockParserFn<I>>,
}

impl<I: LineInput> Parser<I> {
    /// Create a parser reading from `input`.
    pub fn new(input: I) -> Self {
        let mut custom_parsers: HashMap<String, BlockParserFn<I>> = HashMap::new();
        custom_parsers.insert("raw".to_string(), parse_raw_block);
        custom_parsers.insert("literal".to_string(), parse_literal_block);
        custom_parsers.insert("folded".to_string(), parse_folded_block);
        custom_parsers.insert("datetime".to_string(), parse_datetime_block);
        custom_parsers.insert("timestamp".to_string(), parse_timestamp_block);
        custom_parsers.insert("json".to_string(), json::parse_json_block);
        Self {
            input,
            line: Vec::new(),
            current_indent: 0,
            line_number: 0,
            block_indent: 0,
            blocklevel: 1,
            json_depth: 0,
            skip_comments: true,
            eof: false,
            custom_parsers,
        }
    }

    /// Register or replace the sub-parser for conversion specifier
    /// `convspec`. Later registrations win.
    pub fn set_custom_parser(&mut self, convspec: impl Into<String>, parser_func: BlockParserFn<I>) {
        self.custom_parsers.insert(convspec.into(), parser_func);
    }

    /// Parse the whole input as a single block-mode value.
    ///
    /// # Errors
    /// Returns [`Error::Eof`] for an input with no value at all, and
    /// [`Error::Parse`] for malformed markup, including anything left in
    /// the input after the value.
    pub fn parse_document(&mut self) -> Result<Value> {
        match self.read_block_line() {
            Ok(()) => {}
            Err(Flow::EndOfBlock) => return Err(Error::Eof),
            Err(Flow::Fatal(error)) => return Err(error),
        }
        let value = parse_block_value(self)?;
        self.ensure_no_more_data()?;
        Ok(value)
    }

    /// Parse the whole input as a JSON value.
    ///
    /// The grammar is strict JSON except that `#` comments are accepted as
    /// whitespace between tokens.
    ///
    /// # Errors
    /// As for [`Parser::parse_document`].
    pub fn parse_json_document(&mut self) -> Result<Value> {
        match self.read_block_line() {
            Ok(()) => {}
            Err(Flow::EndOfBlock) => return Err(Error::Eof),
            Err(Flow::Fatal(error)) => return Err(error),
        }
        let value = json::parse_json_block(self)?;
        self.ensure_no_more_data()?;
        Ok(value)
    }

    /// The current line, right-trimmed, as code points.
    #[must_use]
    pub fn current_line(&self) -> &[char] {
        &self.line
    }

    /// 1-based number of the current line.
    #[must_use]
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Position of the first non-space character of the current block on
    /// the current line. The block may start mid-line for nested values.
    #[must_use]
    pub fn start_position(&self) -> usize {
        if self.block_indent < self.current_indent {
            self.current_indent
        } else {
            self.skip_spaces(self.block_indent)
        }
    }

    /// Whether the current line holds nothing but whitespace or a comment
    /// from `position` on.
    #[must_use]
    pub fn comment_or_end_of_line(&self, position: usize) -> bool {
        let position = self.skip_spaces(position);
        position >= self.line.len() || self.line[position] == COMMENT
    }

    /// Build a parse error at `column` on the current line.
    #[track_caller]
    #[must_use]
    pub fn error(&self, column: usize, description: impl Into<String>) -> Error {
        Error::Parse(ParseError::new(self.line_number, column, description))
    }

    /// Read the lines of the current block, starting with the current
    /// line, each stripped of the block indentation.
    ///
    /// On return the block is consumed; the next unindented line, if any,
    /// stays available to the enclosing block.
    ///
    /// # Errors
    /// Returns any I/O error raised by the input.
    pub fn block_lines(&mut self) -> Result<Vec<String>> {
        self.read_block().map_err(|flow| self.end_of_block_error(flow))
    }

    // ---------------------------------------------------------------
    // Line and block reading
    // ---------------------------------------------------------------

    /// Read one line into the buffer, right-trim it and measure its indent.
    fn read_raw_line(&mut self) -> std::io::Result<bool> {
        let mut buf = String::new();
        if !self.input.read_line(&mut buf)? {
            return Ok(false);
        }
        let trimmed = buf.trim_end_matches([' ', '\t', '\r']);
        self.line.clear();
        self.line.extend(trimmed.chars());
        self.current_indent = self.line.iter().take_while(|c| **c == ' ').count();
        self.line_number = self.input.line_number();
        Ok(true)
    }

    fn is_comment_line(&self) -> bool {
        self.line.get(self.current_indent) == Some(&COMMENT)
    }

    /// Advance to the next line of the current block.
    ///
    /// This is the only way the parser moves forward in block mode. Empty
    /// lines are delivered as-is; leading comments of a fresh block are
    /// skipped; an unindented content line is pushed back to the input and
    /// ends the block.
    pub(crate) fn read_block_line(&mut self) -> PResult<()> {
        if self.eof {
            return Err(Flow::EndOfBlock);
        }
        loop {
            match self.read_raw_line() {
                Ok(true) => {}
                Ok(false) => {
                    self.eof = true;
                    self.line.clear();
                    return Err(Flow::EndOfBlock);
                }
                Err(error) => return Err(error.into()),
            }
            if self.skip_comments {
                if self.line.is_empty() || self.is_comment_line() {
                    continue;
                }
                self.skip_comments = false;
            }
            if self.line.is_empty() {
                return Ok(());
            }
            if self.current_indent >= self.block_indent {
                return Ok(());
            }
            if self.is_comment_line() {
                // unindented comments do not end the block
                continue;
            }
            let line: String = self.line.iter().collect();
            self.input.unread_line(line);
            self.line.clear();
            return Err(Flow::EndOfBlock);
        }
    }

    /// Collect the current block, starting with the current line, as
    /// strings stripped of the block indentation.
    pub(crate) fn read_block(&mut self) -> PResult<Vec<String>> {
        let mut lines = Vec::new();
        loop {
            lines.push(self.substring(self.block_indent, self.line.len()));
            match self.read_block_line() {
                Ok(()) => {}
                Err(Flow::EndOfBlock) => return Ok(lines),
                Err(fatal) => return Err(fatal),
            }
        }
    }

    fn ensure_no_more_data(&mut self) -> Result<()> {
        loop {
            if self.eof {
                return Ok(());
            }
            if !(self.line.is_empty() || self.is_comment_line()) {
                return Err(self.error(self.current_indent, "Extra data after parsed value"));
            }
            match self.read_block_line() {
                Ok(()) => {}
                Err(Flow::EndOfBlock) => return Ok(()),
                Err(Flow::Fatal(error)) => return Err(error),
            }
        }
    }

    // ---------------------------------------------------------------
    // Character helpers
    // ---------------------------------------------------------------

    pub(crate) fn skip_spaces(&self, mut position: usize) -> usize {
        while matches!(self.line.get(position), Some(c) if c.is_ascii_whitespace()) {
            position += 1;
        }
        position
    }

    fn space_or_eol_at(&self, position: usize) -> bool {
        match self.line.get(position) {
            Some(c) => c.is_ascii_whitespace(),
            None => true,
        }
    }

    pub(crate) fn substring(&self, start: usize, end: usize) -> String {
        let start = start.min(self.line.len());
        let end = end.min(self.line.len());
        self.line[start..end].iter().collect()
    }

    pub(crate) fn substring_eq(&self, start: usize, text: &str) -> bool {
        let end = start + text.chars().count();
        end <= self.line.len() && self.line[start..end].iter().copied().eq(text.chars())
    }

    fn find_char(&self, wanted: char, start: usize) -> Option<usize> {
        if start >= self.line.len() {
            return None;
        }
        self.line[start..]
            .iter()
            .position(|c| *c == wanted)
            .map(|offset| start + offset)
    }

    /// Find an unescaped closing quote from `start` on.
    pub(crate) fn find_closing_quote(&self, quote: char, mut start: usize) -> Option<usize> {
        loop {
            let end = self.find_char(quote, start)?;
            if end > 0 && self.line[end - 1] == '\\' {
                start = end + 1;
            } else {
                return Some(end);
            }
        }
    }

    pub(crate) fn end_of_block_error(&self, flow: Flow) -> Error {
        match flow {
            Flow::EndOfBlock => {
                Error::Parse(ParseError::new(
                    self.line_number,
                    self.current_indent,
                    "Unexpected end of block",
                ))
            }
            Flow::Fatal(error) => error,
        }
    }

    // ---------------------------------------------------------------
    // Nested blocks
    // ---------------------------------------------------------------

    /// Run `parser_func` on a nested block starting at column `block_pos`
    /// of the current line.
    fn parse_nested_block(&mut self, block_pos: usize, parser_func: BlockParserFn<I>) -> Result<Value> {
        if self.blocklevel >= MAX_NESTED_BLOCKS {
            return Err(self.error(self.current_indent, "Too many nested blocks"));
        }
        self.blocklevel += 1;
        let saved_block_indent = self.block_indent;
        self.block_indent = block_pos;
        let result = parser_func(self);
        self.block_indent = saved_block_indent;
        self.blocklevel -= 1;
        result
    }

    /// Read the next line and run `parser_func` on a nested block with
    /// indent `block_pos`.
    fn parse_nested_block_from_next_line(
        &mut self,
        block_pos: usize,
        parser_func: BlockParserFn<I>,
    ) -> Result<Value> {
        let saved_block_indent = self.block_indent;
        self.block_indent = block_pos;
        self.skip_comments = true;
        let status = self.read_block_line();
        self.block_indent = saved_block_indent;
        match status {
            Ok(()) => self.parse_nested_block(block_pos, parser_func),
            Err(Flow::EndOfBlock) => Err(self.error(self.current_indent, "Empty block")),
            Err(Flow::Fatal(error)) => Err(error),
        }
    }

    // ---------------------------------------------------------------
    // Conversion specifiers
    // ---------------------------------------------------------------

    /// Try to read a conversion specifier whose opening colon sits at
    /// `opening_colon_pos`. Returns the registered name and the position
    /// right after the closing colon.
    fn parse_convspec(&self, opening_colon_pos: usize) -> Option<(String, usize)> {
        let start = opening_colon_pos + 1;
        let closing = self.find_char(':', start)?;
        if closing == start {
            // empty specifier
            return None;
        }
        if !self.space_or_eol_at(closing + 1) {
            return None;
        }
        let name = self.substring(start, closing).trim().to_string();
        if !self.custom_parsers.contains_key(&name) {
            return None;
        }
        Some((name, closing + 1))
    }

    // ---------------------------------------------------------------
    // Quoted strings
    // ---------------------------------------------------------------

    /// Parse a quoted string whose opening quote sits at
    /// `opening_quote_pos`. Returns the decoded text and the position
    /// right after the closing quote.
    fn parse_quoted_string(&mut self, opening_quote_pos: usize) -> Result<(String, usize)> {
        let quote = self.line[opening_quote_pos];

        if let Some(end) = self.find_closing_quote(quote, opening_quote_pos + 1) {
            // single-line string
            let (text, _) =
                unescape_line(&self.line, self.line_number, Some(quote), opening_quote_pos + 1)?;
            return Ok((text, end + 1));
        }

        // The string continues on the following lines: read them as a
        // nested block indented past the opening quote.
        let block_indent = opening_quote_pos + 1;
        let saved_block_indent = self.block_indent;
        self.block_indent = block_indent;
        self.blocklevel += 1;

        let mut lines = Vec::new();
        let mut line_numbers = Vec::new();
        let mut end_pos = 0;
        let mut closed = false;
        loop {
            line_numbers.push(self.line_number);
            if let Some(end) = self.find_closing_quote(quote, block_indent) {
                let final_line = self.substring(block_indent, end);
                lines.push(final_line.trim_end().to_string());
                end_pos = end + 1;
                closed = true;
                break;
            }
            lines.push(self.substring(block_indent, self.line.len()));
            match self.read_block_line() {
                Ok(()) => {}
                Err(Flow::EndOfBlock) => break,
                Err(Flow::Fatal(error)) => return Err(error),
            }
        }

        self.block_indent = saved_block_indent;
        self.blocklevel -= 1;

        if !closed {
            // The block ran out before a closing quote. Accept one
            // degenerate continuation: a line holding the quote at the
            // opening column.
            match self.read_block_line() {
                Ok(()) => {}
                Err(Flow::EndOfBlock) => {
                    return Err(self.error(self.current_indent, "String has no closing quote"));
                }
                Err(Flow::Fatal(error)) => return Err(error),
            }
            if self.current_indent == opening_quote_pos
                && self.line.get(self.current_indent) == Some(&quote)
            {
                end_pos = opening_quote_pos + 1;
            } else {
                return Err(self.error(self.current_indent, "String has no closing quote"));
            }
        }

        let text = fold_lines(lines, Some((quote, &line_numbers)))?;
        Ok((text, end_pos))
    }

    // ---------------------------------------------------------------
    // The state machine
    // ---------------------------------------------------------------

    /// Parse the value starting at the current block position.
    ///
    /// With `want_key` the value is expected to be a map key and must end
    /// with a key-value separator; the caller receives the key and the
    /// position of its value instead of a finished value.
    fn parse_value(&mut self, want_key: bool) -> Result<Parsed> {
        let start = self.start_position();
        let chr = self.line.get(start).copied();

        // A leading colon may open a conversion specifier.
        if chr == Some(':') {
            if want_key {
                return Err(self.error(start, "Map key expected and it cannot start with colon"));
            }
            let Some((convspec, value_pos)) = self.parse_convspec(start) else {
                return parse_literal_block(self).map(Parsed::Value);
            };
            if self.comment_or_end_of_line(value_pos) {
                // The specifier takes the whole line: the sub-parser
                // consumes the enclosing block, starting at the next line.
                match self.read_block_line() {
                    Ok(()) => {}
                    Err(Flow::EndOfBlock) => {
                        return Err(self.error(self.current_indent, "Empty block"));
                    }
                    Err(Flow::Fatal(error)) => return Err(error),
                }
                let parser_func = self.custom_parsers[&convspec];
                return parser_func(self).map(Parsed::Value);
            }
            let parser_func = self.custom_parsers[&convspec];
            return self.parse_nested_block(value_pos, parser_func).map(Parsed::Value);
        }

        if chr == Some('-') {
            let next = start + 1;
            if matches!(self.line.get(next), Some(c) if c.is_ascii_digit()) {
                let (number, end) =
                    parse_number(&self.line, self.line_number, next, -1, BLOCK_TERMINATORS)?;
                return self.check_value_end(number, end, want_key);
            }
            if self.space_or_eol_at(next) {
                if want_key {
                    return Err(self.error(start, "Map key expected and it cannot be a list"));
                }
                return self.parse_list().map(Parsed::Value);
            }
            // a word starting with a dash: literal string or map key
            return self.parse_literal_or_map(start, want_key);
        }

        if chr == Some('"') || chr == Some('\'') {
            let start_line = self.line_number;
            let (text, end_pos) = self.parse_quoted_string(start)?;
            let value = Value::String(text);
            if self.line_number == start_line {
                // a single-line string can be a map key
                return self.check_value_end(value, end_pos, want_key);
            }
            if want_key {
                return Err(self.error(end_pos, "Map key expected"));
            }
            if self.comment_or_end_of_line(end_pos) {
                return Ok(Parsed::Value(value));
            }
            return Err(self.error(end_pos, "Bad character after quoted string"));
        }

        if self.substring_eq(start, "null") {
            return self.check_value_end(Value::Null, start + 4, want_key);
        }
        if self.substring_eq(start, "true") {
            return self.check_value_end(Value::Bool(true), start + 4, want_key);
        }
        if self.substring_eq(start, "false") {
            return self.check_value_end(Value::Bool(false), start + 5, want_key);
        }

        let mut start = start;
        let mut chr = chr;
        if chr == Some('+') && matches!(self.line.get(start + 1), Some(c) if c.is_ascii_digit()) {
            start += 1;
            chr = self.line.get(start).copied();
        }
        if matches!(chr, Some(c) if c.is_ascii_digit()) {
            let (number, end) =
                parse_number(&self.line, self.line_number, start, 1, BLOCK_TERMINATORS)?;
            return self.check_value_end(number, end, want_key);
        }

        self.parse_literal_or_map(start, want_key)
    }

    /// The fallthrough case: scan the line for a key-value separator; with
    /// one the block is a map, without one it is a literal string.
    fn parse_literal_or_map(&mut self, start: usize, want_key: bool) -> Result<Parsed> {
        let mut pos = start;
        while let Some(colon_pos) = self.find_char(':', pos) {
            if let Some((value_pos, convspec)) = self.is_kv_separator(colon_pos) {
                let key_text = self.substring(start, colon_pos);
                let key = Value::String(key_text.trim_end().to_string());
                if want_key {
                    return Ok(Parsed::Key {
                        key,
                        value_pos,
                        convspec,
                    });
                }
                return self.parse_map(key, convspec, value_pos).map(Parsed::Value);
            }
            pos = colon_pos + 1;
        }
        if want_key {
            return Err(self.error(self.current_indent, "Not a key"));
        }
        parse_literal_block(self).map(Parsed::Value)
    }

    /// Decide whether the colon at `colon_pos` separates a key from a
    /// value: it does iff it is followed by whitespace, end of line, or a
    /// valid conversion specifier. Returns the value position and the
    /// specifier, if any.
    fn is_kv_separator(&self, colon_pos: usize) -> Option<(usize, Option<String>)> {
        let next = colon_pos + 1;
        if next >= self.line.len() {
            return Some((next, None));
        }
        let chr = self.line[next];
        let spec_pos = if chr.is_ascii_whitespace() {
            // the value is separated from the key by exactly one space;
            // any further indentation belongs to the value's block
            let value_pos = next + 1;
            let after = self.skip_spaces(next);
            if after >= self.line.len() || self.line[after] != ':' {
                return Some((value_pos, None));
            }
            after
        } else if chr == ':' {
            next
        } else {
            return None;
        };
        // a colon introducing something that is not a registered
        // specifier is not a separator at all
        self.parse_convspec(spec_pos)
            .map(|(convspec, end)| (end, Some(convspec)))
    }

    /// After a value that could be a map key: verify what follows it on
    /// the line and either finish the value, start a map with it, or hand
    /// it to the caller as a key.
    fn check_value_end(&mut self, value: Value, end_pos: usize, want_key: bool) -> Result<Parsed> {
        let end_pos = self.skip_spaces(end_pos);
        if end_pos >= self.line.len() || self.line[end_pos] == COMMENT {
            if want_key {
                return Err(self.error(end_pos, "Map key expected"));
            }
            match self.read_block_line() {
                Ok(()) | Err(Flow::EndOfBlock) => {}
                Err(Flow::Fatal(error)) => return Err(error),
            }
            return Ok(Parsed::Value(value));
        }
        let chr = self.line[end_pos];
        if chr == ':' {
            if let Some((value_pos, convspec)) = self.is_kv_separator(end_pos) {
                if want_key {
                    return Ok(Parsed::Key {
                        key: value,
                        value_pos,
                        convspec,
                    });
                }
                return self.parse_map(value, convspec, value_pos).map(Parsed::Value);
            }
            return Err(self.error(end_pos + 1, "Bad character encountered"));
        }
        Err(self.error(end_pos, "Bad character encountered"))
    }

    /// Parse a list. The current line holds the first `-`.
    fn parse_list(&mut self) -> Result<Value> {
        let mut result = Sequence::new();

        // All items share the indent of the first one.
        let item_indent = self.start_position();
        loop {
            if self.line.get(item_indent) != Some(&'-') {
                return Err(self.error(item_indent, "Bad list item"));
            }
            let next = item_indent + 1;
            if !self.space_or_eol_at(next) {
                return Err(self.error(item_indent, "Bad list item"));
            }
            let item = if self.comment_or_end_of_line(next) {
                self.parse_nested_block_from_next_line(item_indent + 2, parse_block_value)?
            } else {
                self.parse_nested_block(next + 1, parse_block_value)?
            };
            result.push(item);

            match self.read_block_line() {
                Ok(()) => {}
                Err(Flow::EndOfBlock) => break,
                Err(Flow::Fatal(error)) => return Err(error),
            }
            if self.current_indent != item_indent {
                return Err(self.error(self.current_indent, "Bad indentation of list item"));
            }
        }
        Ok(Value::Sequence(result))
    }

    /// Parse a map. The first key is already parsed; its value starts at
    /// `value_pos` on the current line.
    fn parse_map(
        &mut self,
        first_key: Value,
        first_convspec: Option<String>,
        first_value_pos: usize,
    ) -> Result<Value> {
        let mut result = Mapping::new();

        // All keys share the indent of the first one.
        let key_indent = self.start_position();
        let mut key = first_key;
        let mut convspec = first_convspec;
        let mut value_pos = first_value_pos;
        loop {
            let parser_func = match &convspec {
                Some(name) => self.custom_parsers[name],
                None => parse_block_value as BlockParserFn<I>,
            };
            let value = if self.comment_or_end_of_line(value_pos) {
                self.parse_nested_block_from_next_line(key_indent + 1, parser_func)?
            } else {
                self.parse_nested_block(value_pos, parser_func)?
            };
            // later keys overwrite earlier ones
            result.insert(key, value);

            match self.read_block_line() {
                Ok(()) => {}
                Err(Flow::EndOfBlock) => break,
                Err(Flow::Fatal(error)) => return Err(error),
            }
            if self.current_indent != key_indent {
                return Err(self.error(self.current_indent, "Bad indentation of map key"));
            }
            match self.parse_value(true)? {
                Parsed::Key {
                    key: next_key,
                    value_pos: next_value_pos,
                    convspec: next_convspec,
                } => {
                    key = next_key;
                    value_pos = next_value_pos;
                    convspec = next_convspec;
                }
                // parse_value in key mode either errors or yields a key
                Parsed::Value(_) => unreachable!(),
            }
        }
        Ok(Value::Mapping(result))
    }

    // ---------------------------------------------------------------
    // JSON support
    // ---------------------------------------------------------------

    pub(crate) fn enter_json(&mut self, position: usize) -> Result<()> {
        if self.json_depth >= MAX_JSON_DEPTH {
            return Err(self.error(position, "Maximum recursion depth exceeded"));
        }
        self.json_depth += 1;
        Ok(())
    }

    pub(crate) fn leave_json(&mut self) {
        self.json_depth -= 1;
    }

    pub(crate) fn is_comment_or_empty_line(&self) -> bool {
        self.line.is_empty() || self.is_comment_line()
    }
}

/// The default block parser: a full block-mode value.
fn parse_block_value<I: LineInput>(parser: &mut Parser<I>) -> Result<Value> {
    match parser.parse_value(false)? {
        Parsed::Value(value) => Ok(value),
        Parsed::Key { .. } => unreachable!(),
    }
}

/// `:raw:` — the block's lines joined verbatim with line feeds.
fn parse_raw_block<I: LineInput>(parser: &mut Parser<I>) -> Result<Value> {
    let mut lines = parser
        .read_block()
        .map_err(|flow| parser.end_of_block_error(flow))?;
    if lines.len() > 1 {
        // a trailing line feed after the last line
        lines.push(String::new());
    }
    Ok(Value::String(lines.join("\n")))
}

/// `:literal:` — dedented block lines joined with line feeds, trailing
/// empty lines dropped.
fn parse_literal_block<I: LineInput>(parser: &mut Parser<I>) -> Result<Value> {
    let mut lines = parser
        .read_block()
        .map_err(|flow| parser.end_of_block_error(flow))?;
    dedent(&mut lines);
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    if lines.len() > 1 {
        lines.push(String::new());
    }
    Ok(Value::String(lines.join("\n")))
}

/// `:folded:` — dedented block lines folded into a single paragraph.
fn parse_folded_block<I: LineInput>(parser: &mut Parser<I>) -> Result<Value> {
    let lines = parser
        .read_block()
        .map_err(|flow| parser.end_of_block_error(flow))?;
    let text = fold_lines(lines, None)?;
    Ok(Value::String(text))
}

/// `:datetime:` — see [`crate::datetime`].
fn parse_datetime_block<I: LineInput>(parser: &mut Parser<I>) -> Result<Value> {
    let start = parser.start_position();
    let datetime = datetime::parse_datetime(&parser.line, parser.line_number, start)?;
    Ok(Value::DateTime(datetime))
}

/// `:timestamp:` — see [`crate::datetime`].
fn parse_timestamp_block<I: LineInput>(parser: &mut Parser<I>) -> Result<Value> {
    let start = parser.start_position();
    let timestamp = datetime::parse_timestamp(&parser.line, parser.line_number, start)?;
    Ok(Value::Timestamp(timestamp))
}

/// Strip the longest common leading-space prefix of the non-empty lines.
fn dedent(lines: &mut [String]) {
    let prefix = lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| line.chars().take_while(|c| *c == ' ').count())
        .min()
        .unwrap_or(0);
    if prefix == 0 {
        return;
    }
    for line in lines.iter_mut() {
        if !line.is_empty() {
            *line = line.chars().skip(prefix).collect();
        }
    }
}

/// Dedent and fold lines into one string: adjacent non-empty lines join
/// with a single space unless the continuation already starts with
/// whitespace; an empty intermediate line becomes a literal line feed and
/// suppresses the joining space.
///
/// With `quoted`, each line is unescaped with the per-line numbers used
/// for error reporting.
fn fold_lines(
    mut lines: Vec<String>,
    quoted: Option<(char, &[u64])>,
) -> std::result::Result<String, ParseError> {
    dedent(&mut lines);

    let Some(start) = lines.iter().position(|line| !line.is_empty()) else {
        return Ok(String::new());
    };
    let end = lines
        .iter()
        .rposition(|line| !line.is_empty())
        .map_or(0, |i| i + 1);

    let mut result = String::new();
    let mut prev_lf = false;
    for (i, line) in lines.iter().enumerate().take(end).skip(start) {
        if i > start {
            if line.is_empty() {
                result.push('\n');
                prev_lf = true;
                continue;
            }
            if prev_lf {
                prev_lf = false;
            } else if !line.starts_with(|c: char| c.is_ascii_whitespace()) {
                result.push(' ');
            }
        }
        match quoted {
            Some((quote, line_numbers)) => {
                let chars: Vec<char> = line.chars().collect();
                let (unescaped, _) = unescape_line(&chars, line_numbers[i], Some(quote), 0)?;
                result.push_str(&unescaped);
            }
            None => result.push_str(line),
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedent_strips_common_prefix() {
        let mut lines = vec!["  a".to_string(), "   b".to_string(), String::new()];
        dedent(&mut lines);
        assert_eq!(lines, ["a", " b", ""]);
    }

    #[test]
    fn fold_joins_lines() {
        let lines = |items: &[&str]| items.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(fold_lines(lines(&["a", "b"]), None).unwrap(), "a b");
        assert_eq!(fold_lines(lines(&["a", "", "b"]), None).unwrap(), "a\nb");
        assert_eq!(fold_lines(lines(&["a", "", "", "b"]), None).unwrap(), "a\n\nb");
        assert_eq!(fold_lines(lines(&["  a", "   b"]), None).unwrap(), "a b");
        assert_eq!(fold_lines(lines(&["a", "  b"]), None).unwrap(), "a  b");
        assert_eq!(fold_lines(lines(&["", "a", ""]), None).unwrap(), "a");
        assert_eq!(fold_lines(lines(&["", ""]), None).unwrap(), "");
    }
}
