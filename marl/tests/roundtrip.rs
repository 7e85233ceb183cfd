//! Emit-then-reparse properties over generated value trees.

#[macro_use]
extern crate quickcheck;

use quickcheck::{Arbitrary, Gen, TestResult};

use marl::{parse_str, DateTime, Emitter, Mapping, Timestamp, Value};

#[derive(Clone, Debug)]
struct Doc(Value);

impl Arbitrary for Doc {
    fn arbitrary(g: &mut Gen) -> Self {
        Doc(arbitrary_value(g, 3))
    }
}

fn arbitrary_value(g: &mut Gen, depth: usize) -> Value {
    if depth == 0 {
        return arbitrary_leaf(g);
    }
    match u8::arbitrary(g) % 4 {
        0 => {
            let len = usize::arbitrary(g) % 4;
            Value::Sequence((0..len).map(|_| arbitrary_value(g, depth - 1)).collect())
        }
        1 => {
            let len = usize::arbitrary(g) % 4;
            let mut members = Mapping::new();
            for _ in 0..len {
                members.insert(arbitrary_key(g), arbitrary_value(g, depth - 1));
            }
            Value::Mapping(members)
        }
        _ => arbitrary_leaf(g),
    }
}

/// Any leaf the parser can read back.
fn arbitrary_leaf(g: &mut Gen) -> Value {
    match u8::arbitrary(g) % 8 {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => arbitrary_int(g),
        3 => Value::UInt(u64::arbitrary(g)),
        4 => arbitrary_float(g),
        5 => Value::String(String::arbitrary(g)),
        6 => Value::DateTime(arbitrary_datetime(g)),
        _ => Value::Timestamp(Timestamp {
            seconds: u64::arbitrary(g),
            nanoseconds: u32::arbitrary(g) % 1_000_000_000,
        }),
    }
}

/// Keys are restricted to what the block form can spell in key position:
/// no containers, no date-times, no timestamps.
fn arbitrary_key(g: &mut Gen) -> Value {
    match u8::arbitrary(g) % 6 {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => arbitrary_int(g),
        3 => Value::UInt(u64::arbitrary(g)),
        4 => arbitrary_float(g),
        _ => Value::String(String::arbitrary(g)),
    }
}

fn arbitrary_int(g: &mut Gen) -> Value {
    let n = i64::arbitrary(g);
    // i64::MIN has no literal: the magnitude of "-9223372036854775808"
    // overflows before the sign applies
    Value::Int(if n == i64::MIN { i64::MAX } else { n })
}

fn arbitrary_float(g: &mut Gen) -> Value {
    let f = f64::arbitrary(g);
    Value::from(if f.is_finite() { f } else { 0.0 })
}

fn arbitrary_datetime(g: &mut Gen) -> DateTime {
    DateTime {
        year: u16::arbitrary(g) % 10000,
        month: 1 + u8::arbitrary(g) % 12,
        day: 1 + u8::arbitrary(g) % 28,
        hour: u8::arbitrary(g) % 24,
        minute: u8::arbitrary(g) % 60,
        second: u8::arbitrary(g) % 60,
        nanosecond: u32::arbitrary(g) % 1_000_000_000,
        // the offset must print as two-digit hours and minutes
        utc_offset_minutes: i32::from(i16::arbitrary(g)) % (99 * 60 + 59),
    }
}

fn emit(value: &Value) -> String {
    let mut out = String::new();
    Emitter::new(&mut out).dump(value).unwrap();
    out
}

quickcheck! {
    fn roundtrip(doc: Doc) -> TestResult {
        let text = emit(&doc.0);
        match parse_str(&text) {
            Ok(reparsed) => {
                if reparsed == doc.0 {
                    TestResult::passed()
                } else {
                    TestResult::error(format!("{:?} reparsed as {reparsed:?}", doc.0))
                }
            }
            Err(err) => TestResult::error(format!("{err} in {text:?}")),
        }
    }

    fn idempotent(doc: Doc) -> TestResult {
        let parsed = match parse_str(&emit(&doc.0)) {
            Ok(value) => value,
            Err(err) => return TestResult::error(err.to_string()),
        };
        let reparsed = match parse_str(&emit(&parsed)) {
            Ok(value) => value,
            Err(err) => return TestResult::error(err.to_string()),
        };
        TestResult::from_bool(reparsed == parsed)
    }
}
