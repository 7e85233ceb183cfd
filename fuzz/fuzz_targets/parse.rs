#![no_main]

use std::io;

use libfuzzer_sys::fuzz_target;
use marl_parser::{parse, parse_str, ReaderInput};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let str_result = parse_str(s);
        let reader_result = parse(ReaderInput::new(io::Cursor::new(s.as_bytes())));

        match (str_result, reader_result) {
            (Ok(a), Ok(b)) => assert_eq!(a, b),
            (Err(_), Err(_)) => {}
            (a, b) => panic!("input sources disagree: {a:?} vs {b:?}"),
        }
    }
});
