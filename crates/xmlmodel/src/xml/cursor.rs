//! Byte cursor with line/column tracking for the XML parser

use crate::error::Pos;

/// Cursor for navigating byte input with position tracking
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    line: u32,
    col: u32,
}

impl<'a> Cursor<'a> {
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Current byte without consuming
    pub fn current(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Consumes bytes while `pred` holds and returns them
    pub fn take_while(&mut self, mut pred: impl FnMut(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while self.current().is_some_and(&mut pred) {
            self.advance();
        }
        self.slice_from(start)
    }

    /// True when the remaining input begins with `pattern`
    pub fn starts_with(&self, pattern: &[u8]) -> bool {
        self.remaining().starts_with(pattern)
    }

    pub fn advance(&mut self) {
        if let Some(b) = self.current() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else if b & 0xC0 != 0x80 {
                // continuation bytes of a UTF-8 sequence share the column
                self.col += 1;
            }
        }
    }

    pub fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    pub fn skip_whitespace(&mut self) {
        self.take_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
    }

    /// Consume byte if it matches
    pub fn consume(&mut self, expected: u8) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub const fn position(&self) -> Pos {
        Pos::new(self.pos, self.line, self.col)
    }

    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.pos..).unwrap_or_default()
    }

    /// Byte offset of the cursor
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Input between `start` and the cursor
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        self.input.get(start..self.pos).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_basic() {
        let mut cursor = Cursor::new(b"<a/>");
        assert_eq!(cursor.current(), Some(b'<'));
        cursor.advance();
        assert_eq!(cursor.current(), Some(b'a'));
        assert!(cursor.starts_with(b"a/>"));
        assert_eq!(cursor.take_while(|b| b != b'>'), b"a/");
        assert_eq!(cursor.current(), Some(b'>'));
    }

    #[test]
    fn test_cursor_lines() {
        let mut cursor = Cursor::new(b"  \n\t<root>");
        cursor.skip_whitespace();
        assert_eq!(cursor.current(), Some(b'<'));
        assert_eq!(cursor.position().line, 2);
        assert_eq!(cursor.position().col, 2);
    }

    #[test]
    fn test_cursor_utf8_columns() {
        let mut cursor = Cursor::new("é<".as_bytes());
        cursor.advance_by(2);
        assert_eq!(cursor.position().col, 2);
        assert_eq!(cursor.current(), Some(b'<'));
    }

    #[test]
    fn test_cursor_slice_and_eof() {
        let mut cursor = Cursor::new(b"abc");
        let start = cursor.pos();
        assert!(cursor.consume(b'a'));
        assert!(!cursor.consume(b'z'));
        cursor.advance_by(5);
        assert!(cursor.is_eof());
        assert_eq!(cursor.slice_from(start), b"abc");
        assert_eq!(cursor.remaining(), b"");
    }
}
