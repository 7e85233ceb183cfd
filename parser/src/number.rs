//! Integer and floating-point literal parsing.

use marl_value::Value;

use crate::error::ParseError;

/// Characters that may legally follow a number in block mode, besides
/// whitespace and end of line.
pub(crate) const BLOCK_TERMINATORS: &[char] = &['#', ':'];

/// Characters that may legally follow a number inside JSON.
pub(crate) const JSON_TERMINATORS: &[char] = &['#', ':', ',', '}', ']'];

/// Parse a number starting at `start`, which points at the first digit.
///
/// The sign has already been consumed by the caller and is passed as
/// `sign` (`1` or `-1`). On success returns the value and the position
/// where conversion stopped.
///
/// Integers may carry a radix prefix (`0b`, `0o`, `0x`, in either case)
/// and `_`/`'` digit separators. Floats are decimal only; their textual
/// form, stripped of separators, is handed to Rust's `f64` parser.
pub(crate) fn parse_number(
    line: &[char],
    line_number: u64,
    start: usize,
    sign: i32,
    allowed_terminators: &[char],
) -> Result<(Value, usize), ParseError> {
    let mut pos = start;
    let mut radix = 10;

    if line[pos] == '0' {
        match line.get(pos + 1) {
            Some('b' | 'B') => {
                radix = 2;
                pos += 2;
            }
            Some('o' | 'O') => {
                radix = 8;
                pos += 2;
            }
            Some('x' | 'X') => {
                radix = 16;
                pos += 2;
            }
            // A second digit would make the zero a leading zero, which is
            // rejected to keep decimal and would-be octal apart.
            Some(c) if c.is_ascii_digit() || *c == '_' || *c == '\'' => {
                return Err(ParseError::new(line_number, start, "Bad number"));
            }
            _ => {}
        }
        if radix != 10 && pos >= line.len() {
            return Err(ParseError::new(line_number, start, "Bad number"));
        }
    }

    let (base, mut end) = parse_unsigned(line, line_number, pos, radix)?;
    pos = end;

    let mut is_float = false;
    if pos < line.len() {
        let mut chr = line[pos];
        if chr == '.' {
            if radix != 10 {
                return Err(decimal_only(line_number, start));
            }
            is_float = true;
            pos = skip_digits(line, pos + 1);
            end = pos;
        }
        if pos < line.len() {
            chr = line[pos];
            if chr == 'e' || chr == 'E' {
                if radix != 10 {
                    return Err(decimal_only(line_number, start));
                }
                is_float = true;
                pos += 1;
                if matches!(line.get(pos), Some('+' | '-')) {
                    pos += 1;
                }
                let next = skip_digits(line, pos);
                if next == pos {
                    return Err(ParseError::new(line_number, start, "Bad exponent"));
                }
                end = next;
                if let Some(&after) = line.get(end) {
                    if !(after.is_ascii_whitespace() || allowed_terminators.contains(&after)) {
                        return Err(ParseError::new(line_number, start, "Bad number"));
                    }
                }
            } else if !(chr.is_ascii_whitespace() || allowed_terminators.contains(&chr)) {
                return Err(ParseError::new(line_number, start, "Bad number"));
            }
        }
    }

    if is_float {
        let text: String = line[start..end]
            .iter()
            .filter(|c| **c != '_' && **c != '\'')
            .collect();
        let Ok(mut number) = text.parse::<f64>() else {
            return Err(ParseError::new(
                line_number,
                start,
                "Floating point conversion error",
            ));
        };
        if number.is_infinite() {
            return Err(ParseError::new(line_number, start, "Floating point overflow"));
        }
        if sign < 0 && number != 0.0 {
            number = -number;
        }
        return Ok((Value::from(number), end));
    }

    let value = if base > i64::MAX as u64 {
        if sign < 0 {
            return Err(ParseError::new(line_number, start, "Integer overflow"));
        }
        Value::UInt(base)
    } else if sign < 0 && base != 0 {
        Value::Int(-(base as i64))
    } else {
        Value::Int(base as i64)
    };
    Ok((value, end))
}

/// Parse a run of digits with optional separators as an unsigned integer.
///
/// Returns the value and the position of the first character past the run.
/// At least one digit is required.
pub(crate) fn parse_unsigned(
    line: &[char],
    line_number: u64,
    start: usize,
    radix: u32,
) -> Result<(u64, usize), ParseError> {
    let mut value: u64 = 0;
    let mut pos = start;
    let mut digit_seen = false;
    let mut separator_seen = false;
    while let Some(&chr) = line.get(pos) {
        if chr == '_' || chr == '\'' {
            if separator_seen {
                return Err(ParseError::new(
                    line_number,
                    pos,
                    "Duplicate separator in the number",
                ));
            }
            if !digit_seen {
                return Err(ParseError::new(
                    line_number,
                    pos,
                    "Separator is not allowed in the beginning of number",
                ));
            }
            separator_seen = true;
            pos += 1;
            continue;
        }
        let Some(digit) = chr.to_digit(radix) else {
            break;
        };
        separator_seen = false;
        value = value
            .checked_mul(u64::from(radix))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or_else(|| ParseError::new(line_number, start, "Numeric overflow"))?;
        digit_seen = true;
        pos += 1;
    }
    if !digit_seen || separator_seen {
        // nothing to convert, or the run ends in a dangling separator
        return Err(ParseError::new(line_number, pos, "Bad number"));
    }
    Ok((value, pos))
}

fn skip_digits(line: &[char], mut pos: usize) -> usize {
    while matches!(line.get(pos), Some(c) if c.is_ascii_digit()) {
        pos += 1;
    }
    pos
}

fn decimal_only(line_number: u64, start: usize) -> ParseError {
    ParseError::new(
        line_number,
        start,
        "Only decimal representation is supported for floating point numbers",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Value, ParseError> {
        parse_signed(text, 1)
    }

    fn parse_signed(text: &str, sign: i32) -> Result<Value, ParseError> {
        let chars: Vec<char> = text.chars().collect();
        parse_number(&chars, 1, 0, sign, BLOCK_TERMINATORS).map(|(v, _)| v)
    }

    #[test]
    fn radixes() {
        assert_eq!(parse("0b101").unwrap(), Value::Int(5));
        assert_eq!(parse("0o17").unwrap(), Value::Int(15));
        assert_eq!(parse("0x2A").unwrap(), Value::Int(42));
        assert_eq!(parse("0X2a").unwrap(), Value::Int(42));
        assert_eq!(parse("0").unwrap(), Value::Int(0));
        assert_eq!(parse("123").unwrap(), Value::Int(123));
    }

    #[test]
    fn leading_zeros_rejected() {
        assert_eq!(parse("07").unwrap_err().description(), "Bad number");
        assert_eq!(parse("007").unwrap_err().description(), "Bad number");
        assert!(parse("0.7").is_ok());
    }

    #[test]
    fn incomplete_radix_prefix() {
        assert_eq!(parse("0x").unwrap_err().description(), "Bad number");
        assert_eq!(parse("0b2").unwrap_err().description(), "Bad number");
    }

    #[test]
    fn separators() {
        assert_eq!(parse("1_000").unwrap(), Value::Int(1000));
        assert_eq!(parse("1'000").unwrap(), Value::Int(1000));
        assert_eq!(parse("1_000_000").unwrap(), Value::Int(1_000_000));
        assert_eq!(
            parse("_1").unwrap_err().description(),
            "Separator is not allowed in the beginning of number"
        );
        assert_eq!(
            parse("1__0").unwrap_err().description(),
            "Duplicate separator in the number"
        );
        assert_eq!(
            parse("1_'0").unwrap_err().description(),
            "Duplicate separator in the number"
        );
        assert_eq!(parse("1_").unwrap_err().description(), "Bad number");
    }

    #[test]
    fn unsigned_overflow() {
        // one past u64::MAX in every radix
        assert_eq!(
            parse("18446744073709551616").unwrap_err().description(),
            "Numeric overflow"
        );
        assert_eq!(
            parse("0x10000000000000000").unwrap_err().description(),
            "Numeric overflow"
        );
        assert_eq!(
            parse("0o2000000000000000000000").unwrap_err().description(),
            "Numeric overflow"
        );
        assert_eq!(
            parse("0b10000000000000000000000000000000000000000000000000000000000000000")
                .unwrap_err()
                .description(),
            "Numeric overflow"
        );
        assert_eq!(
            parse("18446744073709551615").unwrap(),
            Value::UInt(u64::MAX)
        );
    }

    #[test]
    fn signed_overflow() {
        assert_eq!(
            parse_signed("9223372036854775808", -1)
                .unwrap_err()
                .description(),
            "Integer overflow"
        );
        assert_eq!(
            parse_signed("9223372036854775807", -1).unwrap(),
            Value::Int(-i64::MAX)
        );
        assert_eq!(parse_signed("0", -1).unwrap(), Value::Int(0));
        assert_eq!(
            parse("9223372036854775808").unwrap(),
            Value::UInt(9_223_372_036_854_775_808)
        );
    }

    #[test]
    fn floats() {
        assert_eq!(parse("1.5").unwrap(), Value::from(1.5));
        assert_eq!(parse("1e3").unwrap(), Value::from(1000.0));
        assert_eq!(parse("2.5e-1").unwrap(), Value::from(0.25));
        assert_eq!(parse_signed("1.5", -1).unwrap(), Value::from(-1.5));
        assert_eq!(parse("1_000.5").unwrap(), Value::from(1000.5));
        assert_eq!(parse("1e").unwrap_err().description(), "Bad exponent");
        assert_eq!(parse("1e+").unwrap_err().description(), "Bad exponent");
        assert_eq!(
            parse("1e400").unwrap_err().description(),
            "Floating point overflow"
        );
        assert_eq!(
            parse("0x1.5").unwrap_err().description(),
            "Only decimal representation is supported for floating point numbers"
        );
        assert_eq!(
            parse("0b1e1").unwrap_err().description(),
            "Only decimal representation is supported for floating point numbers"
        );
    }

    #[test]
    fn terminators() {
        let chars: Vec<char> = "12: x".chars().collect();
        let (value, end) = parse_number(&chars, 1, 0, 1, BLOCK_TERMINATORS).unwrap();
        assert_eq!(value, Value::Int(12));
        assert_eq!(end, 2);

        let chars: Vec<char> = "12,".chars().collect();
        assert_eq!(
            parse_number(&chars, 1, 0, 1, BLOCK_TERMINATORS)
                .unwrap_err()
                .description(),
            "Bad number"
        );
        assert!(parse_number(&chars, 1, 0, 1, JSON_TERMINATORS).is_ok());
    }
}
