//! Date-time and timestamp literal parsing.
//!
//! The `:datetime:` form is `YYYY[-]MM[-]DD`, optionally followed (after
//! `T` or whitespace) by `HH[:]MM[:]SS`, a fractional second of one to nine
//! digits, and `Z` or a `±HH[:]MM` offset. The `:timestamp:` form is a
//! non-negative decimal second count with the same optional fraction.

use marl_value::{DateTime, Timestamp};

use crate::error::ParseError;

const BAD_DATETIME: &str = "Bad date/time";
const BAD_TIMESTAMP: &str = "Bad timestamp";

/// Parse a date-time starting at `start`; the rest of the line may hold
/// only whitespace and a comment.
pub(crate) fn parse_datetime(
    line: &[char],
    line_number: u64,
    start: usize,
) -> Result<DateTime, ParseError> {
    let mut result = DateTime::default();

    let (year, pos) = fixed_digits(line, line_number, start, 4, BAD_DATETIME)?;
    result.year = year as u16;
    let (month, pos) = fixed_digits(line, line_number, skip_separator(line, pos, '-'), 2, BAD_DATETIME)?;
    result.month = month as u8;
    let (day, pos) = fixed_digits(line, line_number, skip_separator(line, pos, '-'), 2, BAD_DATETIME)?;
    result.day = day as u8;
    let mut pos = pos;

    // A `T` makes the time part mandatory; whitespace makes it optional.
    if line.get(pos) == Some(&'T') {
        pos += 1;
    } else {
        pos = skip_spaces(line, pos);
        if pos >= line.len() || line[pos] == '#' {
            return finish_datetime(line, line_number, result, pos);
        }
    }

    let (hour, next) = fixed_digits(line, line_number, pos, 2, BAD_DATETIME)?;
    result.hour = hour as u8;
    let (minute, next) =
        fixed_digits(line, line_number, skip_separator(line, next, ':'), 2, BAD_DATETIME)?;
    result.minute = minute as u8;
    let (second, next) =
        fixed_digits(line, line_number, skip_separator(line, next, ':'), 2, BAD_DATETIME)?;
    result.second = second as u8;
    pos = next;

    if line.get(pos) == Some(&'Z') {
        return finish_datetime(line, line_number, result, pos + 1);
    }
    if line.get(pos) == Some(&'.') {
        let Some((nanoseconds, next)) = parse_fraction(line, pos + 1) else {
            return Err(ParseError::new(line_number, pos + 1, BAD_DATETIME));
        };
        result.nanosecond = nanoseconds;
        pos = next;
    }
    match line.get(pos) {
        Some('Z') => pos += 1,
        Some(chr @ ('+' | '-')) => {
            let sign = if *chr == '-' { -1 } else { 1 };
            let (hours, next) = fixed_digits(line, line_number, pos + 1, 2, BAD_DATETIME)?;
            pos = skip_separator(line, next, ':');
            let mut minutes = 0;
            if matches!(line.get(pos), Some(c) if c.is_ascii_digit()) {
                let (parsed, next) = fixed_digits(line, line_number, pos, 2, BAD_DATETIME)?;
                minutes = parsed;
                pos = next;
            }
            result.utc_offset_minutes = sign * (hours as i32 * 60 + minutes as i32);
        }
        _ => {}
    }
    finish_datetime(line, line_number, result, pos)
}

fn finish_datetime(
    line: &[char],
    line_number: u64,
    result: DateTime,
    pos: usize,
) -> Result<DateTime, ParseError> {
    let pos = skip_spaces(line, pos);
    if pos < line.len() && line[pos] != '#' {
        return Err(ParseError::new(line_number, pos, BAD_DATETIME));
    }
    Ok(result)
}

/// Parse a timestamp starting at `start`; the rest of the line may hold
/// only whitespace and a comment.
pub(crate) fn parse_timestamp(
    line: &[char],
    line_number: u64,
    start: usize,
) -> Result<Timestamp, ParseError> {
    let (seconds, mut pos) = crate::number::parse_unsigned(line, line_number, start, 10)?;
    let mut result = Timestamp {
        seconds,
        nanoseconds: 0,
    };
    if pos >= line.len() {
        return Ok(result);
    }
    if line[pos] == '.' {
        let Some((nanoseconds, next)) = parse_fraction(line, pos + 1) else {
            return Err(ParseError::new(line_number, pos + 1, BAD_TIMESTAMP));
        };
        result.nanoseconds = nanoseconds;
        pos = next;
    }
    let pos = skip_spaces(line, pos);
    if pos < line.len() && line[pos] != '#' {
        return Err(ParseError::new(line_number, pos, BAD_TIMESTAMP));
    }
    Ok(result)
}

/// Parse one to nine fractional digits into nanoseconds.
///
/// Returns `None` when there is no digit at all or a tenth one follows.
fn parse_fraction(line: &[char], start: usize) -> Option<(u32, usize)> {
    let mut value: u32 = 0;
    let mut count = 0;
    let mut pos = start;
    while let Some(digit) = line.get(pos).and_then(|c| c.to_digit(10)) {
        if count == 9 {
            return None;
        }
        value = value * 10 + digit;
        count += 1;
        pos += 1;
    }
    if count == 0 {
        return None;
    }
    Some((value * 10u32.pow(9 - count), pos))
}

fn fixed_digits(
    line: &[char],
    line_number: u64,
    mut pos: usize,
    count: usize,
    description: &'static str,
) -> Result<(u32, usize), ParseError> {
    let mut value = 0;
    for _ in 0..count {
        match line.get(pos).and_then(|c| c.to_digit(10)) {
            Some(digit) => value = value * 10 + digit,
            None => return Err(ParseError::new(line_number, pos, description)),
        }
        pos += 1;
    }
    Ok((value, pos))
}

fn skip_separator(line: &[char], pos: usize, separator: char) -> usize {
    if line.get(pos) == Some(&separator) {
        pos + 1
    } else {
        pos
    }
}

fn skip_spaces(line: &[char], mut pos: usize) -> usize {
    while matches!(line.get(pos), Some(c) if c.is_ascii_whitespace()) {
        pos += 1;
    }
    pos
}
