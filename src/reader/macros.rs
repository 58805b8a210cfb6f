//! Reader macros: syntax rewritten into ordinary call-shaped lists.
//!
//! The head of every rewritten list is a synthesized token that reads as the
//! word (`quote`, `vector`, ...) but reconstructs as the source syntax, so
//! the list's code still matches the source.

use super::{unclosed, ReadErr, ReadResult, Reader};
use crate::data::{Cons, Form, List};
use crate::lexer::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ReaderMacro {
    /// `'form`
    Quote,
    /// `` `form ``
    Quasiquote,
    /// `~form`
    Unquote,
    /// `~@form`
    SpliceUnquote,
    /// `[form*]`
    Vector,
    /// `{form*}`
    Record,
    /// `#` followed by `[` or `{`.
    Hash,
}

impl ReaderMacro {
    pub(super) fn triggered_by(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Quote => Some(ReaderMacro::Quote),
            TokenKind::Quasiquote => Some(ReaderMacro::Quasiquote),
            TokenKind::Unquote => Some(ReaderMacro::Unquote),
            TokenKind::SpliceUnquote => Some(ReaderMacro::SpliceUnquote),
            TokenKind::LBrack => Some(ReaderMacro::Vector),
            TokenKind::LBrace => Some(ReaderMacro::Record),
            TokenKind::Hash => Some(ReaderMacro::Hash),
            _ => None,
        }
    }
}

/// A collection literal: the word it rewrites to and the token closing it.
struct Collection {
    word: &'static str,
    close: TokenKind,
    close_char: char,
}

const VECTOR: Collection = Collection {
    word: "vector",
    close: TokenKind::RBrack,
    close_char: ']',
};

const RECORD: Collection = Collection {
    word: "record",
    close: TokenKind::RBrace,
    close_char: '}',
};

impl Reader {
    pub(super) fn read_macro(&mut self, reader_macro: ReaderMacro) -> ReadResult<Form> {
        let trigger = self.expect_token()?;
        match reader_macro {
            ReaderMacro::Quote => self.read_quote(&trigger, "quote"),
            ReaderMacro::Quasiquote => self.read_quote(&trigger, "quasiquote"),
            ReaderMacro::Unquote => self.read_quote(&trigger, "unquote"),
            ReaderMacro::SpliceUnquote => self.read_quote(&trigger, "splice-unquote"),
            ReaderMacro::Vector => {
                let head = Token::synthesized(TokenKind::Identifier, VECTOR.word, &trigger);
                self.read_collection(&trigger, head, &VECTOR)
            }
            ReaderMacro::Record => {
                let head = Token::synthesized(TokenKind::Identifier, RECORD.word, &trigger);
                self.read_collection(&trigger, head, &RECORD)
            }
            ReaderMacro::Hash => self.read_hash(&trigger),
        }
    }

    /// `'x` and friends: `(quote x)`.
    fn read_quote(&mut self, trigger: &Token, word: &str) -> ReadResult<Form> {
        if self.at_end() {
            return Err(ReadErr::Incomplete {
                message: format!("expected a form after {:?}, got EOF", trigger.lexeme),
                location: trigger.location.clone(),
            });
        }
        let head = Token::synthesized(TokenKind::Reserved, word, trigger);
        let quoted = self.read_expr(0)?;
        let cells = Cons::of(head.into(), [quoted]);
        Ok(List::new(cells, "", "", trigger.location.clone()).into())
    }

    /// `#[...]` and `#{...}`: the same as the bare bracket forms.
    fn read_hash(&mut self, hash: &Token) -> ReadResult<Form> {
        let collection = match self.tokens.peek().map(|t| t.kind) {
            Some(TokenKind::LBrack) => &VECTOR,
            Some(TokenKind::LBrace) => &RECORD,
            Some(TokenKind::Eof) | None => {
                return Err(ReadErr::Incomplete {
                    message: "expected a reader macro after \"#\", got EOF".to_owned(),
                    location: hash.location.clone(),
                })
            }
            Some(_) => {
                let found = self.tokens.peek().map(|t| t.lexeme.clone()).unwrap_or_default();
                return Err(ReadErr::Error {
                    message: format!("unknown reader macro #{}", found),
                    location: hash.location.clone(),
                });
            }
        };
        let bracket = self.expect_token()?;
        let mut head = Token::synthesized(TokenKind::Identifier, collection.word, hash);
        head.expanded_from = Some(format!(
            "{}{}{}",
            hash.source_text(),
            bracket.trivia,
            bracket.source_text()
        ));
        self.read_collection(hash, head, collection)
    }

    /// Forms up to the collection's closing token, behind a synthesized head.
    fn read_collection(
        &mut self,
        open: &Token,
        head: Token,
        collection: &Collection,
    ) -> ReadResult<Form> {
        let mut items = Vec::new();
        loop {
            if self.at_end() {
                return Err(unclosed(open, collection.close_char));
            }
            if self.tokens.peek().is_some_and(|t| t.is(collection.close)) {
                break;
            }
            items.push(self.read_expr(0)?);
        }
        let close = self.expect_token()?;
        let cells = Cons::of(Form::from(head), items);
        Ok(List::new(cells, "", &close.code(), open.location.clone()).into())
    }
}
