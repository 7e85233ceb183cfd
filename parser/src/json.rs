//! The JSON sub-parser.
//!
//! Strict JSON, driven by the same line buffer as block mode, with one
//! extension: `#` comments count as whitespace anywhere between tokens.
//! Whitespace includes line breaks, so a JSON island may span the rest of
//! its block. Running out of block mid-value is an error here, unlike in
//! block mode.

use marl_value::{Mapping, Sequence, Value};

use crate::error::{Flow, Result};
use crate::escape::unescape_line;
use crate::input::LineInput;
use crate::number::{parse_number, JSON_TERMINATORS};
use crate::parser::{Parser, COMMENT};

/// `:json:` — parse the block as one JSON value; nothing but whitespace
/// and comments may follow it in the block.
pub(crate) fn parse_json_block<I: LineInput>(parser: &mut Parser<I>) -> Result<Value> {
    let start = parser.start_position();
    let (value, end) = parse_json_value(parser, start)?;

    if !parser.comment_or_end_of_line(end) {
        return Err(parser.error(end, "Garbage after JSON value"));
    }
    // The closing line is clean; the rest of the block must be too.
    loop {
        match parser.read_block_line() {
            Ok(()) => {
                if !parser.is_comment_or_empty_line() {
                    return Err(parser.error(parser.current_indent, "Garbage after JSON value"));
                }
            }
            Err(Flow::EndOfBlock) => return Ok(value),
            Err(Flow::Fatal(error)) => return Err(error),
        }
    }
}

/// Skip whitespace and comments, reading further block lines as needed,
/// and return the position of the next token.
fn next_token_position<I: LineInput>(parser: &mut Parser<I>, mut pos: usize) -> Result<usize> {
    loop {
        pos = parser.skip_spaces(pos);
        if pos < parser.current_line().len() && parser.current_line()[pos] != COMMENT {
            return Ok(pos);
        }
        match parser.read_block_line() {
            Ok(()) => pos = parser.start_position(),
            Err(flow) => return Err(parser.end_of_block_error(flow)),
        }
    }
}

/// Parse one JSON value starting at or after `pos`. Returns the value and
/// the position right after it.
fn parse_json_value<I: LineInput>(parser: &mut Parser<I>, pos: usize) -> Result<(Value, usize)> {
    let pos = next_token_position(parser, pos)?;
    match parser.current_line()[pos] {
        '{' => parse_object(parser, pos),
        '[' => parse_array(parser, pos),
        '"' => {
            let (text, end) = parse_string(parser, pos)?;
            Ok((Value::String(text), end))
        }
        '-' => {
            if !matches!(parser.current_line().get(pos + 1), Some(c) if c.is_ascii_digit()) {
                return Err(parser.error(pos, "Unexpected character"));
            }
            let (value, end) = parse_number(
                parser.current_line(),
                parser.line_number(),
                pos + 1,
                -1,
                JSON_TERMINATORS,
            )?;
            Ok((value, end))
        }
        c if c.is_ascii_digit() => {
            let (value, end) = parse_number(
                parser.current_line(),
                parser.line_number(),
                pos,
                1,
                JSON_TERMINATORS,
            )?;
            Ok((value, end))
        }
        'n' | 't' | 'f' => parse_keyword(parser, pos),
        _ => Err(parser.error(pos, "Unexpected character")),
    }
}

fn parse_keyword<I: LineInput>(parser: &mut Parser<I>, pos: usize) -> Result<(Value, usize)> {
    let (value, end) = if parser.substring_eq(pos, "null") {
        (Value::Null, pos + 4)
    } else if parser.substring_eq(pos, "true") {
        (Value::Bool(true), pos + 4)
    } else if parser.substring_eq(pos, "false") {
        (Value::Bool(false), pos + 5)
    } else {
        return Err(parser.error(pos, "Unexpected character"));
    };
    if let Some(&chr) = parser.current_line().get(end) {
        if !(chr.is_whitespace() || JSON_TERMINATORS.contains(&chr)) {
            return Err(parser.error(end, "Unexpected character"));
        }
    }
    Ok((value, end))
}

/// A JSON string must close on the line it opened on.
fn parse_string<I: LineInput>(parser: &mut Parser<I>, pos: usize) -> Result<(String, usize)> {
    let Some(end) = parser.find_closing_quote('"', pos + 1) else {
        return Err(parser.error(pos, "String has no closing quote"));
    };
    let (text, _) = unescape_line(
        parser.current_line(),
        parser.line_number(),
        Some('"'),
        pos + 1,
    )?;
    Ok((text, end + 1))
}

fn parse_array<I: LineInput>(parser: &mut Parser<I>, open_pos: usize) -> Result<(Value, usize)> {
    parser.enter_json(open_pos)?;
    let mut items = Sequence::new();

    let mut pos = next_token_position(parser, open_pos + 1)?;
    if parser.current_line()[pos] == ']' {
        parser.leave_json();
        return Ok((Value::Sequence(items), pos + 1));
    }
    loop {
        let (value, end) = parse_json_value(parser, pos)?;
        items.push(value);
        pos = next_token_position(parser, end)?;
        match parser.current_line()[pos] {
            ',' => pos = next_token_position(parser, pos + 1)?,
            ']' => {
                pos += 1;
                break;
            }
            _ => return Err(parser.error(pos, "Array items must be separated with comma")),
        }
    }
    parser.leave_json();
    Ok((Value::Sequence(items), pos))
}

fn parse_object<I: LineInput>(parser: &mut Parser<I>, open_pos: usize) -> Result<(Value, usize)> {
    parser.enter_json(open_pos)?;
    let mut members = Mapping::new();

    let mut pos = next_token_position(parser, open_pos + 1)?;
    if parser.current_line()[pos] == '}' {
        parser.leave_json();
        return Ok((Value::Mapping(members), pos + 1));
    }
    loop {
        if parser.current_line()[pos] != '"' {
            return Err(parser.error(pos, "Unexpected character"));
        }
        let (key, end) = parse_string(parser, pos)?;
        pos = next_token_position(parser, end)?;
        if parser.current_line()[pos] != ':' {
            return Err(parser.error(pos, "Values must be separated from keys with colon"));
        }
        let (value, end) = parse_json_value(parser, pos + 1)?;
        members.insert(Value::String(key), value);
        pos = next_token_position(parser, end)?;
        match parser.current_line()[pos] {
            ',' => pos = next_token_position(parser, pos + 1)?,
            '}' => {
                pos += 1;
                break;
            }
            _ => return Err(parser.error(pos, "Object members must be separated with comma")),
        }
    }
    parser.leave_json();
    Ok((Value::Mapping(members), pos))
}
