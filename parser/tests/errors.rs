use std::io;

use marl_parser::{
    parse_json_str, parse_str, Error, LineInput, ParseError, Parser, StrInput, Value,
};

fn parse_error(source: &str) -> ParseError {
    match parse_str(source) {
        Err(Error::Parse(err)) => err,
        other => panic!("{source:?}: expected a parse error, got {other:?}"),
    }
}

fn json_error(source: &str) -> ParseError {
    match parse_json_str(source) {
        Err(Error::Parse(err)) => err,
        other => panic!("{source:?}: expected a parse error, got {other:?}"),
    }
}

#[test]
fn empty_document_is_eof() {
    assert!(matches!(parse_str(""), Err(Error::Eof)));
    assert!(matches!(parse_str("# only comments\n\n"), Err(Error::Eof)));
    assert!(matches!(parse_json_str(""), Err(Error::Eof)));
}

#[test]
fn bad_list_item_indentation() {
    let err = parse_error("- 1\n - 2\n");
    assert_eq!(err.description(), "Bad indentation of list item");
    assert_eq!(err.line(), 2);
    assert_eq!(err.column(), 1);
}

#[test]
fn bad_map_key_indentation() {
    let err = parse_error("a: 1\n  b: 2\n");
    assert_eq!(err.description(), "Bad indentation of map key");
    assert_eq!(err.line(), 2);
    assert_eq!(err.column(), 2);
}

#[test]
fn list_continuation_must_be_dashed() {
    assert_eq!(parse_error("- 1\nx y\n").description(), "Bad list item");
    assert_eq!(parse_error("- 1\n-not item\n").description(), "Bad list item");
}

#[test]
fn map_key_restrictions() {
    assert_eq!(
        parse_error("a: 1\n:json: 2\n").description(),
        "Map key expected and it cannot start with colon"
    );
    assert_eq!(
        parse_error("a: 1\n- 2\n").description(),
        "Map key expected and it cannot be a list"
    );
    assert_eq!(parse_error("a: 1\nplainword\n").description(), "Not a key");
    assert_eq!(
        parse_error("a: 1\n\"multi\n       line\"\n").description(),
        "Map key expected"
    );
}

#[test]
fn empty_blocks() {
    assert_eq!(parse_error("a:\n").description(), "Empty block");
    assert_eq!(parse_error(":literal:\n").description(), "Empty block");
    assert_eq!(parse_error("- \n").description(), "Empty block");
}

#[test]
fn keyword_followed_by_garbage() {
    assert_eq!(parse_error("true x\n").description(), "Bad character encountered");
    // keyword matching is by length: "nullable" is `null` + garbage
    assert_eq!(parse_error("nullable: 1\n").description(), "Bad character encountered");
}

#[test]
fn unterminated_strings() {
    assert_eq!(
        parse_error("k: \"abc\n").description(),
        "String has no closing quote"
    );
    assert_eq!(
        parse_error("\"abc\ndef\n").description(),
        "String has no closing quote"
    );
}

#[test]
fn garbage_after_quoted_string() {
    assert_eq!(
        parse_error("k: \"a\n    b\" x\n").description(),
        "Bad character after quoted string"
    );
}

#[test]
fn number_errors_surface_in_documents() {
    assert_eq!(parse_error("v: 07\n").description(), "Bad number");
    assert_eq!(parse_error("v: 1__0\n").description(), "Duplicate separator in the number");
    assert_eq!(
        parse_error("v: 0x_1\n").description(),
        "Separator is not allowed in the beginning of number"
    );
    assert_eq!(
        parse_error("v: 18446744073709551616\n").description(),
        "Numeric overflow"
    );
    assert_eq!(
        parse_error("v: -9223372036854775808\n").description(),
        "Integer overflow"
    );
    assert_eq!(
        parse_error("v: 1e400\n").description(),
        "Floating point overflow"
    );
    assert_eq!(
        parse_error("v: 0x1.5\n").description(),
        "Only decimal representation is supported for floating point numbers"
    );
}

#[test]
fn extra_data_after_document() {
    assert_eq!(
        parse_error("1\n2\n").description(),
        "Extra data after parsed value"
    );
    assert_eq!(
        parse_error("\"abc\"\nxyz\n").description(),
        "Extra data after parsed value"
    );
}

#[test]
fn block_depth_cap() {
    // 99 dashes put the innermost value at nesting depth 100
    let ok = format!("{}1\n", "- ".repeat(99));
    assert!(parse_str(&ok).is_ok());

    let too_deep = format!("{}1\n", "- ".repeat(100));
    assert_eq!(
        parse_error(&too_deep).description(),
        "Too many nested blocks"
    );
}

#[test]
fn json_depth_cap() {
    let ok = format!("{}{}", "[".repeat(100), "]".repeat(100));
    assert!(parse_json_str(&ok).is_ok());

    let too_deep = format!("{}{}", "[".repeat(101), "]".repeat(101));
    assert_eq!(
        json_error(&too_deep).description(),
        "Maximum recursion depth exceeded"
    );
}

#[test]
fn json_trailing_comma() {
    let err = json_error("{\"a\": 1,}\n");
    assert_eq!(err.description(), "Unexpected character");
    assert_eq!(err.line(), 1);
    assert_eq!(err.column(), 8);

    assert_eq!(json_error("[1,]\n").description(), "Unexpected character");
}

#[test]
fn json_separator_errors() {
    assert_eq!(
        json_error("{\"a\" 1}\n").description(),
        "Values must be separated from keys with colon"
    );
    assert_eq!(
        json_error("[1 2]\n").description(),
        "Array items must be separated with comma"
    );
    assert_eq!(
        json_error("{\"a\": 1 \"b\": 2}\n").description(),
        "Object members must be separated with comma"
    );
}

#[test]
fn json_garbage_after_value() {
    assert_eq!(
        json_error("[1] extra\n").description(),
        "Garbage after JSON value"
    );
    assert_eq!(
        json_error("[1]\nmore\n").description(),
        "Garbage after JSON value"
    );
    assert_eq!(
        parse_error("j: :json: [1] extra\n").description(),
        "Garbage after JSON value"
    );
}

#[test]
fn json_unexpected_end_of_block() {
    assert_eq!(
        parse_error("j: :json: [1,\n").description(),
        "Unexpected end of block"
    );
    assert_eq!(json_error("{\"a\":\n").description(), "Unexpected end of block");
}

#[test]
fn json_accepts_comments_between_tokens() {
    let doc = parse_json_str("[1, # first\n 2] # done\n").unwrap();
    assert_eq!(doc[0].as_i64(), Some(1));
    assert_eq!(doc[1].as_i64(), Some(2));
}

#[test]
fn json_string_must_close_on_its_line() {
    assert_eq!(
        json_error("[\"abc\n\"]\n").description(),
        "String has no closing quote"
    );
}

#[test]
fn bad_datetime_in_document() {
    assert_eq!(
        parse_error("d: :datetime: 2024-1-1\n").description(),
        "Bad date/time"
    );
    assert_eq!(
        parse_error("t: :timestamp: 12x\n").description(),
        "Bad timestamp"
    );
}

/// A line source that records every pushed-back line.
struct Recording<'a> {
    inner: StrInput<'a>,
    unread: Vec<String>,
}

impl LineInput for Recording<'_> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<bool> {
        self.inner.read_line(buf)
    }

    fn unread_line(&mut self, line: String) {
        self.unread.push(line.clone());
        self.inner.unread_line(line);
    }

    fn line_number(&self) -> u64 {
        self.inner.line_number()
    }
}

#[test]
fn unindented_line_is_pushed_back_and_reread() {
    let mut input = Recording {
        inner: StrInput::new("k:\n  - 1\nnext: 2\n"),
        unread: Vec::new(),
    };
    let doc = {
        let mut parser = Parser::new(&mut input);
        parser.parse_document().unwrap()
    };
    assert_eq!(doc["k"][0], Value::Int(1));
    assert_eq!(doc["next"], Value::Int(2));
    // The nested list ended when it saw "next: 2"; that line went back to
    // the input and was read again by the enclosing map.
    assert!(input.unread.iter().any(|line| line == "next: 2"));
}
