//! Support for reading forms from a token stream.

use std::io::ErrorKind;

use crate::data::{Cons, Form, List, MemberAccess};
use crate::diagnostics::{snippet, Diagnostic, DiagnosticBag};
use crate::lexer::{LexOutput, Token, TokenKind};
use crate::location::SourceLocation;

mod macros;
mod tokens;

use macros::ReaderMacro;
pub use tokens::TokenReader;

/// Error type if a read does not complete.
///
/// A reader may experience a true tokenizing/parsing error, e.g. "()", that no additional input can fix.
/// This is distinct from a reader that gets an unexpected end-of-input, e.g. "(()":
/// it may be that more input will fix the issue.
///
/// If input is coming in interactively, this is a useful distinction;
/// in the first case, we'd want to indicate an error to the user,
/// while in the latter we'd like to prompt the user for more input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadErr {
    #[error("syntax error: {message} in {location}")]
    Error {
        message: String,
        location: SourceLocation,
    },
    #[error("incomplete input: {message} in {location}")]
    Incomplete {
        message: String,
        location: SourceLocation,
    },
}

impl ReadErr {
    pub fn message(&self) -> &str {
        match self {
            ReadErr::Error { message, .. } | ReadErr::Incomplete { message, .. } => message,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            ReadErr::Error { location, .. } | ReadErr::Incomplete { location, .. } => location,
        }
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self, ReadErr::Incomplete { .. })
    }

    /// Add additional context to an error.
    pub fn annotate(self, more: impl AsRef<str>) -> Self {
        match self {
            ReadErr::Error { message, location } => ReadErr::Error {
                message: format!("{}: {}", more.as_ref(), message),
                location,
            },
            ReadErr::Incomplete { message, location } => ReadErr::Incomplete {
                message: format!("{}: {}", more.as_ref(), message),
                location,
            },
        }
    }
}

/// The main result type for this module:
/// a T (token, form, etc), or an error, or incomplete.
pub type ReadResult<T> = Result<T, ReadErr>;

impl From<ReadErr> for std::io::Error {
    fn from(value: ReadErr) -> Self {
        let kind = if value.is_incomplete() {
            ErrorKind::BrokenPipe
        } else {
            ErrorKind::InvalidInput
        };
        std::io::Error::new(kind, value)
    }
}

/// Forms read from one source unit.
///
/// `forms` ends with the `Eof` token as a sentinel, which carries any
/// trailing trivia; consumers that only want the program should skip it.
#[derive(Debug, Clone, Default)]
pub struct ReadOutput {
    pub forms: Vec<Form>,
    pub diagnostics: DiagnosticBag,
}

impl ReadOutput {
    /// Forms without the trailing sentinel.
    pub fn program(&self) -> &[Form] {
        match self.forms.split_last() {
            Some((last, rest)) if last.is_eof() => rest,
            _ => &self.forms,
        }
    }

    /// Concatenated code of every form, sentinel included: the text that was read.
    pub fn source(&self) -> String {
        self.forms.iter().map(|f| f.code()).collect()
    }
}

/// Read every form in the token stream.
///
/// A result of Incomplete indicates that the input may become complete if
/// more is provided. The returned diagnostics are the lexer's, followed by
/// any the reader records.
pub fn read(lexed: LexOutput) -> ReadResult<ReadOutput> {
    let LexOutput {
        tokens,
        mut diagnostics,
    } = lexed;
    let mut reader = Reader::new(tokens);
    let mut forms = Vec::new();

    while let Some(token) = reader.tokens.peek() {
        if token.is(TokenKind::Eof) {
            break;
        }
        let form = reader.read_expr(0)?;
        tracing::trace!(form = %form, "read form");
        forms.push(form);
    }
    if let Some(eof) = reader.tokens.next() {
        forms.push(Form::Token(eof));
    }

    diagnostics.merge(reader.diagnostics);
    tracing::debug!(
        forms = forms.len(),
        diagnostics = diagnostics.len(),
        "read input"
    );
    Ok(ReadOutput { forms, diagnostics })
}

/// Binding power of the member-access operators.
const MEMBER_BINDING_POWER: u8 = 90;

fn binding_power(kind: TokenKind) -> Option<u8> {
    kind.is_member_operator().then_some(MEMBER_BINDING_POWER)
}

/// Deepest nesting of lists and reader macros a read accepts.
pub const MAX_NESTING: usize = 128;

/// State of one `read` call.
struct Reader {
    tokens: TokenReader,
    diagnostics: DiagnosticBag,
    /// Lists and reader macros currently open.
    depth: usize,
}

impl Reader {
    fn new(tokens: Vec<Token>) -> Self {
        Reader {
            tokens: TokenReader::new(tokens),
            diagnostics: DiagnosticBag::new(),
            depth: 0,
        }
    }

    /// Record a non-fatal problem with `form`.
    fn diagnose(&mut self, message: &str, form: &Form) {
        let code = form.code();
        let trivia = code.len() - code.trim_start().len();
        let diagnostic = Diagnostic {
            message: message.to_owned(),
            source_span: snippet(&code, trivia),
            location: form.location().clone(),
        };
        tracing::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Next token, or an Incomplete error if the stream ran out without an `Eof`.
    fn expect_token(&mut self) -> ReadResult<Token> {
        match self.tokens.next() {
            Some(token) => Ok(token),
            None => Err(ReadErr::Incomplete {
                message: "unexpected end of input".to_owned(),
                location: self.tokens.end_location(),
            }),
        }
    }

    /// Read one form, then fold any trailing member accesses into it.
    ///
    /// Only operators binding tighter than `min_bp` are taken; reading each
    /// property at the operators' own power makes chains left-associative,
    /// so `a.b.c` reads as `(a.b).c`.
    fn read_expr(&mut self, min_bp: u8) -> ReadResult<Form> {
        let mut left = self.read_form()?;
        let mut accesses = 0;

        while let Some(bp) = self.tokens.peek().and_then(|t| binding_power(t.kind)) {
            if bp <= min_bp {
                break;
            }
            accesses += 1;
            if self.depth + accesses > MAX_NESTING {
                return Err(self.too_deep());
            }
            let operator = self.expect_token()?;
            let property = self.read_expr(bp)?;
            if !is_property_name(&property) {
                self.diagnose("member property should be an identifier", &property);
            }
            left = MemberAccess::new(left, &operator, property).into();
        }
        Ok(left)
    }

    fn read_form(&mut self) -> ReadResult<Form> {
        let kind = match self.tokens.peek() {
            Some(token) => token.kind,
            None => TokenKind::Eof,
        };
        let reader_macro = ReaderMacro::triggered_by(kind);
        if reader_macro.is_none() && kind != TokenKind::LParen {
            return self.read_atom();
        }

        if self.depth >= MAX_NESTING {
            return Err(self.too_deep());
        }
        self.depth += 1;
        let form = match reader_macro {
            Some(reader_macro) => self.read_macro(reader_macro),
            None => self.read_list(),
        };
        self.depth -= 1;
        form
    }

    fn read_list(&mut self) -> ReadResult<Form> {
        let open = self.expect_token()?;
        if self.tokens.peek().is_some_and(|t| t.is(TokenKind::RParen)) {
            return Err(ReadErr::Error {
                message: "parenthesized list cannot be empty".to_owned(),
                location: open.location,
            });
        }
        if self.at_end() {
            return Err(unclosed(&open, ')'));
        }

        let first = self.read_expr(0)?;
        let mut rest = Vec::new();
        loop {
            if self.at_end() {
                return Err(unclosed(&open, ')'));
            }
            if self.tokens.peek().is_some_and(|t| t.is(TokenKind::RParen)) {
                break;
            }
            rest.push(self.read_expr(0)?);
        }
        let close = self.expect_token()?;

        let cells = Cons::of(first, rest);
        let location = open.location.clone();
        Ok(List::new(cells, &open.code(), &close.code(), location).into())
    }

    fn read_atom(&mut self) -> ReadResult<Form> {
        let token = self.expect_token()?;
        match token.kind {
            kind if kind.is_atom() => Ok(Form::Token(token)),
            TokenKind::Eof => Err(ReadErr::Incomplete {
                message: "unexpected end of input".to_owned(),
                location: token.location,
            }),
            kind => Err(ReadErr::Error {
                message: format!("invalid token type {} ({:?})", kind, token.lexeme),
                location: token.location,
            }),
        }
    }

    /// Nesting limit error at the current token.
    fn too_deep(&self) -> ReadErr {
        let location = match self.tokens.peek() {
            Some(token) => token.location.clone(),
            None => self.tokens.end_location(),
        };
        ReadErr::Error {
            message: format!("forms nested more than {} deep", MAX_NESTING),
            location,
        }
    }

    /// True if no more forms can be read: at the `Eof` token or past the stream.
    fn at_end(&self) -> bool {
        self.tokens.peek().map_or(true, |t| t.is(TokenKind::Eof))
    }
}

fn is_property_name(form: &Form) -> bool {
    form.as_token()
        .is_some_and(|t| matches!(t.kind, TokenKind::Identifier | TokenKind::Reserved))
}

/// Error for input that ended before `open` was closed with `close`.
fn unclosed(open: &Token, close: char) -> ReadErr {
    ReadErr::Incomplete {
        message: format!("expected {:?}, got EOF", close),
        location: open.location.clone(),
    }
}
