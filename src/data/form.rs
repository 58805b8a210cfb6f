//! Concrete syntax tree forms.
//!
//! Every form can give back the exact source text it was read from: a
//! token through its trivia and lexeme, lists and member accesses through
//! the `code` assembled while reading them.

use std::borrow::Cow;

use super::cons::Cons;
use crate::lexer::{Token, TokenKind};
use crate::location::SourceLocation;

#[derive(Debug, Clone, PartialEq)]
pub enum Form {
    /// Atomic literal, identifier or keyword.
    Token(Token),
    /// Parenthesized list or the call shape a reader macro expanded into.
    List(Box<List>),
    Member(MemberAccess),
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub cells: Cons<Form>,
    pub code: String,
    pub location: SourceLocation,
}

/// `object.property`, or `object.?property` when `optional` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccess {
    pub object: Box<Form>,
    pub property: Box<Form>,
    pub optional: bool,
    pub code: String,
    pub location: SourceLocation,
}

impl List {
    /// Wrap `cells`, rebuilding the code from the elements plus the given delimiters.
    pub fn new(cells: Cons<Form>, open: &str, close: &str, location: SourceLocation) -> Self {
        let mut code = open.to_owned();
        for form in cells.iter() {
            code.push_str(&form.code());
        }
        code.push_str(close);
        List {
            cells,
            code,
            location,
        }
    }

    pub fn iter(&self) -> super::cons::Iter<'_, Form> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// The leading element; for a reader-macro expansion, its synthesized head.
    pub fn head(&self) -> &Form {
        self.cells.head()
    }
}

impl MemberAccess {
    pub fn new(object: Form, operator: &Token, property: Form) -> Self {
        let code = format!("{}{}{}", object.code(), operator.code(), property.code());
        MemberAccess {
            location: object.location().clone(),
            object: Box::new(object),
            property: Box::new(property),
            optional: operator.is(TokenKind::OptionalDot),
            code,
        }
    }
}

impl Form {
    /// The exact source text this form was read from, leading trivia included.
    pub fn code(&self) -> Cow<'_, str> {
        match self {
            Form::Token(token) => token.code(),
            Form::List(list) => Cow::Borrowed(&list.code),
            Form::Member(member) => Cow::Borrowed(&member.code),
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            Form::Token(token) => &token.location,
            Form::List(list) => &list.location,
            Form::Member(member) => &member.location,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Form::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Form::List(list) => Some(list.as_ref()),
            _ => None,
        }
    }

    pub fn as_member(&self) -> Option<&MemberAccess> {
        match self {
            Form::Member(member) => Some(member),
            _ => None,
        }
    }

    /// The end-of-input sentinel closing every read.
    pub fn is_eof(&self) -> bool {
        matches!(self, Form::Token(token) if token.is(TokenKind::Eof))
    }
}

impl From<Token> for Form {
    fn from(value: Token) -> Self {
        Form::Token(value)
    }
}

impl From<List> for Form {
    fn from(value: List) -> Self {
        Form::List(Box::new(value))
    }
}

impl From<MemberAccess> for Form {
    fn from(value: MemberAccess) -> Self {
        Form::Member(value)
    }
}

/// Renders the source text the form was read from.
impl std::fmt::Display for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code())
    }
}
