//! Character cursor over the source text.

use std::sync::Arc;

use crate::location::SourceLocation;

/// Owns the read position in a source string.
///
/// Position is a byte offset; line and column are 1-indexed and advance with
/// every consumed character. Reading past the end yields `None`.
pub struct Input<'a> {
    source: &'a str,
    file: Arc<str>,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Input<'a> {
    pub fn new(source: &'a str, file: impl Into<Arc<str>>) -> Self {
        Input {
            source,
            file: file.into(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// The character `n` positions after the current one; `lookahead(0)` is `peek()`.
    pub fn lookahead(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    pub fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    pub fn skip(&mut self) {
        self.next();
    }

    /// Consume characters while `pred` holds, returning the consumed slice.
    pub fn read_while(&mut self, mut pred: impl FnMut(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.next();
        }
        &self.source[start..self.pos]
    }

    /// Source text from `start` up to the current position.
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.pos]
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.pos, self.file.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::Input;

    #[test]
    fn next_tracks_lines_and_columns() {
        let mut input = Input::new("ab\nc", "<test>");
        assert_eq!(input.next(), Some('a'));
        assert_eq!(input.next(), Some('b'));
        let loc = input.location();
        assert_eq!((loc.line, loc.column, loc.offset), (1, 3, 2));
        assert_eq!(input.next(), Some('\n'));
        let loc = input.location();
        assert_eq!((loc.line, loc.column, loc.offset), (2, 1, 3));
        assert_eq!(input.next(), Some('c'));
        assert!(input.eof());
        assert_eq!(input.next(), None);
        assert_eq!(input.location().column, 2);
    }

    #[test]
    fn lookahead_past_end_is_none() {
        let input = Input::new("\"\"", "<test>");
        assert_eq!(input.lookahead(0), Some('"'));
        assert_eq!(input.lookahead(1), Some('"'));
        assert_eq!(input.lookahead(2), None);
        assert_eq!(input.lookahead(10), None);
    }

    #[test]
    fn read_while_stops_at_predicate_and_eof() {
        let mut input = Input::new("123abc", "<test>");
        assert_eq!(input.read_while(|c| c.is_ascii_digit()), "123");
        assert_eq!(input.read_while(|c| c.is_ascii_digit()), "");
        assert_eq!(input.read_while(|_| true), "abc");
        assert!(input.eof());
    }

    #[test]
    fn offsets_are_bytes() {
        let mut input = Input::new("λx", "<test>");
        input.skip();
        let loc = input.location();
        assert_eq!(loc.offset, 2);
        assert_eq!(loc.column, 2);
        assert_eq!(input.peek(), Some('x'));
    }
}
