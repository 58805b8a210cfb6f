//! Lexical tokens.

use std::borrow::Cow;

use crate::location::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Integer,
    Decimal,
    Double,
    String,
    MultilineString,
    Boolean,
    Nil,
    Identifier,
    Reserved,
    Keyword,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Quote,
    Quasiquote,
    Unquote,
    SpliceUnquote,
    Amp,
    Dot,
    OptionalDot,
    Hash,
    Question,
    Eof,
    /// Malformed text, paired with a diagnostic.
    Bad,
}

impl TokenKind {
    /// Kinds the reader accepts as atoms.
    pub fn is_atom(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Integer
                | Decimal
                | Double
                | String
                | MultilineString
                | Boolean
                | Keyword
                | Nil
                | Amp
                | Reserved
                | Identifier
        )
    }

    /// Member-access operators: `.` and `.?`.
    pub fn is_member_operator(self) -> bool {
        matches!(self, TokenKind::Dot | TokenKind::OptionalDot)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A token along with its source position and the trivia in front of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the token.
    /// For tokens synthesized by a reader macro, the word the macro expands to.
    pub lexeme: String,
    pub location: SourceLocation,
    /// Whitespace and comments between the previous token and this one.
    pub trivia: String,
    /// Decoded contents of a string literal, delimiters stripped.
    pub value: Option<String>,
    /// Reader-macro syntax a synthesized token stands in for, e.g. `'` for `quote`.
    pub expanded_from: Option<String>,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        location: SourceLocation,
        trivia: impl Into<String>,
    ) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            location,
            trivia: trivia.into(),
            value: None,
            expanded_from: None,
        }
    }

    /// Token standing in for a reader macro: reads as `word`, reconstructs as `trigger`'s text.
    pub fn synthesized(kind: TokenKind, word: &str, trigger: &Token) -> Self {
        Token {
            kind,
            lexeme: word.to_owned(),
            location: trigger.location.clone(),
            trivia: trigger.trivia.clone(),
            value: None,
            expanded_from: Some(trigger.source_text().to_owned()),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Text this token occupied in the source, without trivia.
    pub fn source_text(&self) -> &str {
        self.expanded_from.as_deref().unwrap_or(&self.lexeme)
    }

    /// Trivia plus source text: exactly the input this token covers.
    pub fn code(&self) -> Cow<'_, str> {
        if self.trivia.is_empty() {
            Cow::Borrowed(self.source_text())
        } else {
            Cow::Owned(format!("{}{}", self.trivia, self.source_text()))
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?})", self.kind, self.lexeme)
    }
}
