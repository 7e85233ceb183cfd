//! Escape-sequence decoding for quoted strings and JSON strings.

use crate::error::ParseError;

/// Decode escape sequences in `line` starting at `start`.
///
/// Decoding stops at the end of the line or at an unescaped `quote`
/// character, whichever comes first. Returns the decoded text together with
/// the position where decoding stopped (the closing quote itself is not
/// consumed).
///
/// Recognized sequences: `\'`, `\"`, `\?`, `\\`, the C control escapes
/// `\a \b \f \n \r \t \v`, `\o` with one to three octal digits, `\x` with
/// exactly two hex digits, and `\u`/`\U` with exactly four/eight hex digits.
/// A backslash at the end of the line is kept literally, as is a backslash
/// preceding any unlisted character.
///
/// The decoder does not insist on the result being sensible text: a numeric
/// escape naming a code point that is not a Unicode scalar value decodes to
/// U+FFFD.
pub(crate) fn unescape_line(
    line: &[char],
    line_number: u64,
    quote: Option<char>,
    start: usize,
) -> Result<(String, usize), ParseError> {
    let mut result = String::with_capacity(line.len().saturating_sub(start));
    let mut pos = start;
    while pos < line.len() {
        let chr = line[pos];
        if Some(chr) == quote {
            // closing quotation mark
            break;
        }
        if chr != '\\' {
            result.push(chr);
            pos += 1;
            continue;
        }
        pos += 1;
        if pos >= line.len() {
            // lone backslash at end of line stays in the result
            result.push('\\');
            break;
        }
        match line[pos] {
            c @ ('\'' | '"' | '?' | '\\') => result.push(c),
            'a' => result.push('\u{07}'),
            'b' => result.push('\u{08}'),
            'f' => result.push('\u{0c}'),
            'n' => result.push('\n'),
            'r' => result.push('\r'),
            't' => result.push('\t'),
            'v' => result.push('\u{0b}'),
            'o' => {
                let mut value = 0u32;
                for i in 0..3 {
                    pos += 1;
                    if pos >= line.len() {
                        if i == 0 {
                            return Err(ParseError::new(
                                line_number,
                                pos,
                                "Incomplete octal value",
                            ));
                        }
                        break;
                    }
                    match line[pos].to_digit(8) {
                        Some(digit) => value = (value << 3) + digit,
                        None => {
                            return Err(ParseError::new(line_number, pos, "Bad octal value"));
                        }
                    }
                }
                push_code_point(&mut result, value);
            }
            'x' => pos = unescape_hex(line, line_number, pos, 2, &mut result)?,
            'u' => pos = unescape_hex(line, line_number, pos, 4, &mut result)?,
            'U' => pos = unescape_hex(line, line_number, pos, 8, &mut result)?,
            other => {
                // not an escape sequence, keep both characters
                result.push('\\');
                result.push(other);
            }
        }
        pos += 1;
    }
    Ok((result, pos))
}

/// Decode `count` hex digits after `pos` and append the code point.
///
/// Returns the position of the last digit consumed.
fn unescape_hex(
    line: &[char],
    line_number: u64,
    mut pos: usize,
    count: usize,
    result: &mut String,
) -> Result<usize, ParseError> {
    let mut value = 0u32;
    for _ in 0..count {
        pos += 1;
        if pos >= line.len() {
            return Err(ParseError::new(
                line_number,
                pos,
                "Incomplete hexadecimal value",
            ));
        }
        match line[pos].to_digit(16) {
            Some(digit) => value = (value << 4) + digit,
            None => {
                return Err(ParseError::new(line_number, pos, "Bad hexadecimal value"));
            }
        }
    }
    push_code_point(result, value);
    Ok(pos)
}

fn push_code_point(result: &mut String, value: u32) {
    result.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
}
