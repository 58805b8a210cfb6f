//! Cursor over a finished token stream.

use crate::lexer::Token;
use crate::location::SourceLocation;

#[derive(Debug, Clone, Default)]
pub struct TokenReader {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenReader {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenReader { tokens, pos: 0 }
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.lookahead(0)
    }

    /// The token `n` places past the current one.
    pub fn lookahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    pub fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.skip();
        token
    }

    pub fn skip(&mut self) {
        if !self.eof() {
            self.pos += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Where the stream ends: the last token's location.
    pub fn end_location(&self) -> SourceLocation {
        self.tokens
            .last()
            .map(|t| t.location.clone())
            .unwrap_or_else(|| SourceLocation::new(1, 1, 0, "<stdin>".into()))
    }
}
