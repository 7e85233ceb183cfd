//! Line-oriented input sources.
//!
//! The parser consumes its input one line at a time and occasionally has to
//! hand a line back when it discovers the line belongs to an enclosing
//! block. Hiding the source behind [`LineInput`] keeps the parser agnostic
//! of whether the text lives in memory or behind a reader, and lets callers
//! resume reading from the source after a parse stops: the pushed-back line
//! is the next one the source yields.

use std::io;

/// Interface for a source of lines.
///
/// Implementations must support exactly one level of pushback: a line given
/// to [`unread_line`] is returned by the next [`read_line`] call, with the
/// reported line number unchanged. The parser never pushes back more than
/// one line at a time.
///
/// [`unread_line`]: LineInput::unread_line
/// [`read_line`]: LineInput::read_line
pub trait LineInput {
    /// Read the next line into `buf`, replacing its contents.
    ///
    /// The line terminator (`\n` or `\r\n`) is not included. Returns
    /// `Ok(false)` when the source is exhausted, in which case `buf` is left
    /// empty.
    ///
    /// # Errors
    /// Returns any I/O error raised by the underlying source.
    fn read_line(&mut self, buf: &mut String) -> io::Result<bool>;

    /// Push one line back; it is returned by the next [`read_line`].
    ///
    /// [`read_line`]: LineInput::read_line
    fn unread_line(&mut self, line: String);

    /// 1-based number of the line most recently returned by [`read_line`].
    ///
    /// Zero before the first read.
    ///
    /// [`read_line`]: LineInput::read_line
    fn line_number(&self) -> u64;
}

impl<T: LineInput + ?Sized> LineInput for &mut T {
    fn read_line(&mut self, buf: &mut String) -> io::Result<bool> {
        (**self).read_line(buf)
    }

    fn unread_line(&mut self, line: String) {
        (**self).unread_line(line);
    }

    fn line_number(&self) -> u64 {
        (**self).line_number()
    }
}

/// A [`LineInput`] over an in-memory string.
pub struct StrInput<'a> {
    rest: &'a str,
    exhausted: bool,
    pushback: Option<String>,
    line_number: u64,
}

impl<'a> StrInput<'a> {
    /// Create an input over `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            rest: source,
            exhausted: source.is_empty(),
            pushback: None,
            line_number: 0,
        }
    }
}

impl LineInput for StrInput<'_> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<bool> {
        buf.clear();
        if let Some(line) = self.pushback.take() {
            buf.push_str(&line);
            self.line_number += 1;
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }
        let line = match self.rest.find('\n') {
            Some(pos) => {
                let line = &self.rest[..pos];
                self.rest = &self.rest[pos + 1..];
                // A terminator at the very end does not start an empty line.
                if self.rest.is_empty() {
                    self.exhausted = true;
                }
                line
            }
            None => {
                let line = self.rest;
                self.rest = "";
                self.exhausted = true;
                line
            }
        };
        buf.push_str(line.strip_suffix('\r').unwrap_or(line));
        self.line_number += 1;
        Ok(true)
    }

    fn unread_line(&mut self, line: String) {
        debug_assert!(self.pushback.is_none());
        self.pushback = Some(line);
        self.line_number -= 1;
    }

    fn line_number(&self) -> u64 {
        self.line_number
    }
}

/// A [`LineInput`] over any buffered reader.
pub struct ReaderInput<R> {
    reader: R,
    pushback: Option<String>,
    line_number: u64,
}

impl<R: io::BufRead> ReaderInput<R> {
    /// Create an input reading lines from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pushback: None,
            line_number: 0,
        }
    }
}

impl<R: io::BufRead> LineInput for ReaderInput<R> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<bool> {
        buf.clear();
        if let Some(line) = self.pushback.take() {
            buf.push_str(&line);
            self.line_number += 1;
            return Ok(true);
        }
        if self.reader.read_line(buf)? == 0 {
            return Ok(false);
        }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        self.line_number += 1;
        Ok(true)
    }

    fn unread_line(&mut self, line: String) {
        debug_assert!(self.pushback.is_none());
        self.pushback = Some(line);
        self.line_number -= 1;
    }

    fn line_number(&self) -> u64 {
        self.line_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<I: LineInput>(mut input: I) -> Vec<String> {
        let mut lines = Vec::new();
        let mut buf = String::new();
        while input.read_line(&mut buf).unwrap() {
            lines.push(buf.clone());
        }
        lines
    }

    #[test]
    fn str_input_splits_lines() {
        assert_eq!(drain(StrInput::new("a\nb\n")), ["a", "b"]);
        assert_eq!(drain(StrInput::new("a\nb")), ["a", "b"]);
        assert_eq!(drain(StrInput::new("a\r\nb\r\n")), ["a", "b"]);
        assert_eq!(drain(StrInput::new("")), Vec::<String>::new());
        assert_eq!(drain(StrInput::new("\n")), [""]);
    }

    #[test]
    fn pushback_preserves_line_numbers() {
        let mut input = StrInput::new("one\ntwo\nthree\n");
        let mut buf = String::new();
        input.read_line(&mut buf).unwrap();
        input.read_line(&mut buf).unwrap();
        assert_eq!(input.line_number(), 2);
        input.unread_line(buf.clone());
        input.read_line(&mut buf).unwrap();
        assert_eq!(buf, "two");
        assert_eq!(input.line_number(), 2);
        input.read_line(&mut buf).unwrap();
        assert_eq!(buf, "three");
        assert_eq!(input.line_number(), 3);
    }

    #[test]
    fn reader_input_reads_lines() {
        let data = io::Cursor::new(b"x\ny z\n".to_vec());
        assert_eq!(drain(ReaderInput::new(data)), ["x", "y z"]);
    }
}
