//! Module for extracting tokens from source text.
//!
//! Whitespace and comments are not tokens of their own: they accumulate as
//! trivia on the token that follows them, so the source can be rebuilt exactly.
//! Malformed numbers become `Bad` tokens plus a diagnostic; unterminated
//! strings and unknown characters stop tokenization with a `ReadErr`.

mod chars;
mod input;
mod token;

pub use chars::{is_reserved, RESERVED};
pub use input::Input;
pub use token::{Token, TokenKind};

use crate::diagnostics::DiagnosticBag;
use crate::location::SourceLocation;
use crate::reader::{ReadErr, ReadResult};
use chars::*;

/// Tokens for one source unit, terminated by exactly one `Eof` token.
#[derive(Debug, Clone, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: DiagnosticBag,
}

/// Split the input into its constituent tokens.
pub fn tokenize(source: &str, file: &str) -> ReadResult<LexOutput> {
    Lexer::new(source, file).tokenize()
}

pub struct Lexer<'a> {
    input: Input<'a>,
    tokens: Vec<Token>,
    diagnostics: DiagnosticBag,
}

/// Radix of an integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Radix {
    Binary,
    Octal,
    Hex,
}

impl Radix {
    fn from_prefix(ch: Option<char>) -> Option<Self> {
        match ch? {
            'x' => Some(Radix::Hex),
            'o' => Some(Radix::Octal),
            'b' => Some(Radix::Binary),
            _ => None,
        }
    }

    fn is_digit(self, ch: char) -> bool {
        match self {
            Radix::Binary => is_bin_digit(ch),
            Radix::Octal => is_oct_digit(ch),
            Radix::Hex => is_hex_digit(ch),
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: &str) -> Self {
        Lexer {
            input: Input::new(source, file),
            tokens: Vec::new(),
            diagnostics: DiagnosticBag::new(),
        }
    }

    pub fn tokenize(mut self) -> ReadResult<LexOutput> {
        loop {
            let trivia = self.read_trivia();
            if self.input.eof() {
                let eof = Token::new(TokenKind::Eof, "", self.input.location(), trivia);
                self.tokens.push(eof);
                break;
            }
            self.read_token(trivia)?;
        }

        tracing::debug!(
            tokens = self.tokens.len(),
            diagnostics = self.diagnostics.len(),
            "tokenized input"
        );
        Ok(LexOutput {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        })
    }

    /// Dispatch on the current character; trivia has already been consumed.
    fn read_token(&mut self, trivia: String) -> ReadResult<()> {
        let Some(ch) = self.input.peek() else {
            return Ok(());
        };
        let next = self.input.lookahead(1);

        match ch {
            '-' if next.is_some_and(is_digit) => self.read_number(trivia),
            c if is_digit(c) => self.read_number(trivia),
            c if is_symbol_start(c) => self.read_identifier(trivia),
            '"' if next == Some('"') && self.input.lookahead(2) == Some('"') => {
                self.read_multiline_string(trivia)?
            }
            '"' => self.read_string(trivia)?,
            ':' => self.read_keyword(trivia),
            '(' => self.read_punc(trivia, TokenKind::LParen, 1),
            ')' => self.read_punc(trivia, TokenKind::RParen, 1),
            '[' => self.read_punc(trivia, TokenKind::LBrack, 1),
            ']' => self.read_punc(trivia, TokenKind::RBrack, 1),
            '{' => self.read_punc(trivia, TokenKind::LBrace, 1),
            '}' => self.read_punc(trivia, TokenKind::RBrace, 1),
            '&' => self.read_punc(trivia, TokenKind::Amp, 1),
            '.' if next == Some('?') => self.read_punc(trivia, TokenKind::OptionalDot, 2),
            '.' => self.read_punc(trivia, TokenKind::Dot, 1),
            '#' => self.read_punc(trivia, TokenKind::Hash, 1),
            '\'' => self.read_punc(trivia, TokenKind::Quote, 1),
            '`' => self.read_punc(trivia, TokenKind::Quasiquote, 1),
            '~' if next == Some('@') => self.read_punc(trivia, TokenKind::SpliceUnquote, 2),
            '~' => self.read_punc(trivia, TokenKind::Unquote, 1),
            '?' => self.read_punc(trivia, TokenKind::Question, 1),
            other => {
                return Err(ReadErr::Error {
                    message: format!("unknown token type {:?}", other),
                    location: self.input.location(),
                })
            }
        }
        Ok(())
    }

    fn push(&mut self, token: Token) {
        tracing::trace!(%token, "token");
        self.tokens.push(token);
    }

    /// Whitespace and `;` comments, up to the next real token.
    fn read_trivia(&mut self) -> String {
        let start = self.input.pos();
        loop {
            match self.input.peek() {
                Some(c) if is_whitespace(c) => {
                    self.input.read_while(is_whitespace);
                }
                Some(';') => {
                    self.input.read_while(|c| c != '\n');
                }
                _ => break,
            }
        }
        self.input.slice_from(start).to_owned()
    }

    fn read_punc(&mut self, trivia: String, kind: TokenKind, width: usize) {
        let location = self.input.location();
        let start = self.input.pos();
        for _ in 0..width {
            self.input.skip();
        }
        let lexeme = self.input.slice_from(start);
        self.push(Token::new(kind, lexeme, location, trivia));
    }

    fn read_identifier(&mut self, trivia: String) {
        let location = self.input.location();
        let id = self.input.read_while(is_symbol_char);
        let kind = match id {
            "true" | "false" => TokenKind::Boolean,
            "nil" => TokenKind::Nil,
            "Infinity" | "-Infinity" | "NaN" => TokenKind::Double,
            _ if is_reserved(id) => TokenKind::Reserved,
            _ => TokenKind::Identifier,
        };
        self.push(Token::new(kind, id, location, trivia));
    }

    fn read_keyword(&mut self, trivia: String) {
        let location = self.input.location();
        let start = self.input.pos();
        self.input.skip();
        self.input.read_while(is_symbol_char);
        let kw = self.input.slice_from(start);
        self.push(Token::new(TokenKind::Keyword, kw, location, trivia));
    }

    /// Record a malformed-literal diagnostic at `location`.
    fn diagnose(&mut self, message: &str, location: &SourceLocation) {
        self.diagnostics
            .add(message, self.input.source(), location.clone());
    }

    fn read_number(&mut self, trivia: String) {
        let location = self.input.location();
        let start = self.input.pos();
        let mut malformed = false;

        if self.input.peek() == Some('-') {
            self.input.skip();
        }

        let radix = match self.input.peek() {
            Some('0') => Radix::from_prefix(self.input.lookahead(1)),
            _ => None,
        };

        let kind = if let Some(radix) = radix {
            self.input.skip();
            self.input.skip();
            if self.input.read_while(|c| radix.is_digit(c)).is_empty() {
                self.diagnose("expected at least one digit after radix prefix", &location);
                malformed = true;
            }
            if self.input.peek() == Some('.') {
                self.diagnose("only base-10 numbers may include a decimal point", &location);
                // Take the rest of the would-be literal so lexing resumes after it.
                self.input.skip();
                self.input.read_while(is_alphanumeric);
                let text = self.input.slice_from(start);
                self.push(Token::new(TokenKind::Bad, text, location, trivia));
                return;
            }
            TokenKind::Integer
        } else {
            self.input.read_while(is_digit);
            if self.input.peek() == Some('.') && !self.member_follows() {
                self.read_fraction(&location, &mut malformed)
            } else {
                TokenKind::Integer
            }
        };

        if !self.input.read_while(is_alphanumeric).is_empty() {
            self.diagnose("invalid characters in numeric literal", &location);
            malformed = true;
        }

        let kind = if malformed { TokenKind::Bad } else { kind };
        let text = self.input.slice_from(start);
        self.push(Token::new(kind, text, location, trivia));
    }

    /// A `.` right after digits starts a fraction unless it is the optional-member operator.
    fn member_follows(&self) -> bool {
        self.input.lookahead(1) == Some('?')
    }

    /// Fractional part, exponent and `f` suffix of a base-10 literal; the `.` is current.
    fn read_fraction(&mut self, location: &SourceLocation, malformed: &mut bool) -> TokenKind {
        self.input.skip();
        if self.input.read_while(is_digit).is_empty() {
            self.diagnose("decimal point must be followed by at least one digit", location);
            *malformed = true;
        }

        if self.input.peek() == Some('e') {
            self.input.skip();
            match self.input.peek() {
                Some('+' | '-') => self.input.skip(),
                _ => {
                    self.diagnose("exponent must include a sign (+ or -)", location);
                    *malformed = true;
                }
            }
            if self.input.read_while(is_digit).is_empty() {
                self.diagnose("exponent must include at least one digit", location);
                *malformed = true;
            }
        }

        if self.input.peek() == Some('f') {
            self.input.skip();
            TokenKind::Double
        } else {
            TokenKind::Decimal
        }
    }

    fn read_string(&mut self, trivia: String) -> ReadResult<()> {
        let location = self.input.location();
        let start = self.input.pos();
        self.input.skip();

        let mut value = String::new();
        loop {
            match self.input.next() {
                None => {
                    return Err(ReadErr::Incomplete {
                        message: "expected double quote to close string literal; got EOF"
                            .to_owned(),
                        location,
                    })
                }
                Some('"') => break,
                Some('\n') => {
                    return Err(ReadErr::Error {
                        message: "unexpected newline in nonterminated single-line string literal"
                            .to_owned(),
                        location,
                    })
                }
                Some('\\') => self.read_escape(&mut value, &location)?,
                Some(c) => value.push(c),
            }
        }

        let text = self.input.slice_from(start);
        let mut token = Token::new(TokenKind::String, text, location, trivia);
        token.value = Some(value);
        self.push(token);
        Ok(())
    }

    fn read_multiline_string(&mut self, trivia: String) -> ReadResult<()> {
        let location = self.input.location();
        let start = self.input.pos();
        for _ in 0..3 {
            self.input.skip();
        }

        let mut value = String::new();
        loop {
            match self.input.next() {
                None => {
                    return Err(ReadErr::Incomplete {
                        message: r#"expected """ to close multiline string; got EOF"#.to_owned(),
                        location,
                    })
                }
                Some('"')
                    if self.input.peek() == Some('"')
                        && self.input.lookahead(1) == Some('"') =>
                {
                    self.input.skip();
                    self.input.skip();
                    // Quotes running on past the close belong to it.
                    self.input.read_while(|c| c == '"');
                    break;
                }
                Some('\\') => self.read_escape(&mut value, &location)?,
                Some(c) => value.push(c),
            }
        }

        let text = self.input.slice_from(start);
        let mut token = Token::new(TokenKind::MultilineString, text, location, trivia);
        token.value = Some(value);
        self.push(token);
        Ok(())
    }

    /// Decode the escape sequence after a backslash into `out`.
    fn read_escape(&mut self, out: &mut String, string_start: &SourceLocation) -> ReadResult<()> {
        let escape_loc = self.input.location();
        let Some(c) = self.input.next() else {
            return Err(ReadErr::Incomplete {
                message: "expected escape sequence to continue string literal; got EOF"
                    .to_owned(),
                location: string_start.clone(),
            });
        };
        match c {
            'n' => out.push('\n'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            'u' | 'U' => {
                let digits = self.input.read_while(is_hex_digit);
                match u32::from_str_radix(digits, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => {
                        self.diagnose("invalid unicode escape sequence", &escape_loc);
                        out.push(char::REPLACEMENT_CHARACTER);
                    }
                }
            }
            // Unknown escapes decode to nothing.
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input, "<test>")
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn lexemes(input: &str) -> Vec<(TokenKind, String)> {
        tokenize(input, "<test>")
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| (t.kind, t.lexeme))
            .collect()
    }

    #[test]
    fn tokenize_atoms() {
        use TokenKind::*;
        let got = lexemes(r#"hello "hi" world 24601 -6 -3.33 3.22f true nil :kw def"#);
        let want: Vec<(TokenKind, std::string::String)> = [
            (Identifier, "hello"),
            (String, r#""hi""#),
            (Identifier, "world"),
            (Integer, "24601"),
            (Integer, "-6"),
            (Decimal, "-3.33"),
            (Double, "3.22f"),
            (Boolean, "true"),
            (Nil, "nil"),
            (Keyword, ":kw"),
            (Reserved, "def"),
            (Eof, ""),
        ]
        .into_iter()
        .map(|(k, s)| (k, s.to_owned()))
        .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn tokenize_parens() {
        use TokenKind::*;
        assert_eq!(
            kinds("(1)( 2 ) [a] {b}"),
            [
                LParen, Integer, RParen, LParen, Integer, RParen, LBrack, Identifier, RBrack,
                LBrace, Identifier, RBrace, Eof
            ]
        );
    }

    #[test]
    fn tokenize_unbalanced() {
        use TokenKind::*;
        assert_eq!(
            kinds(")))()("),
            [RParen, RParen, RParen, LParen, RParen, LParen, Eof]
        );
    }

    #[test]
    fn two_character_punctuation() {
        use TokenKind::*;
        assert_eq!(
            lexemes("~@a ~b a.?b a.b & # ? 'x `y"),
            [
                (SpliceUnquote, "~@".to_owned()),
                (Identifier, "a".to_owned()),
                (Unquote, "~".to_owned()),
                (Identifier, "b".to_owned()),
                (Identifier, "a".to_owned()),
                (OptionalDot, ".?".to_owned()),
                (Identifier, "b".to_owned()),
                (Identifier, "a".to_owned()),
                (Dot, ".".to_owned()),
                (Identifier, "b".to_owned()),
                (Amp, "&".to_owned()),
                (Hash, "#".to_owned()),
                (Question, "?".to_owned()),
                (Quote, "'".to_owned()),
                (Identifier, "x".to_owned()),
                (Quasiquote, "`".to_owned()),
                (Identifier, "y".to_owned()),
                (Eof, "".to_owned()),
            ]
        );
    }

    #[test]
    fn special_identifiers() {
        use TokenKind::*;
        assert_eq!(
            kinds("Infinity -Infinity NaN false - -x"),
            [Double, Double, Double, Boolean, Identifier, Identifier, Eof]
        );
    }

    #[test]
    fn radix_literals() {
        use TokenKind::*;
        assert_eq!(
            lexemes("0xff 0o17 0b101 -0x1F 0"),
            [
                (Integer, "0xff".to_owned()),
                (Integer, "0o17".to_owned()),
                (Integer, "0b101".to_owned()),
                (Integer, "-0x1F".to_owned()),
                (Integer, "0".to_owned()),
                (Eof, "".to_owned()),
            ]
        );
    }

    #[test]
    fn exponents() {
        use TokenKind::*;
        let out = tokenize("1.5e+10 2.0e-3f", "<test>").unwrap();
        assert!(out.diagnostics.is_empty());
        let got: Vec<_> = out.tokens.iter().map(|t| (t.kind, t.lexeme.as_str())).collect();
        assert_eq!(got, [(Decimal, "1.5e+10"), (Double, "2.0e-3f"), (Eof, "")]);
    }

    #[test]
    fn radix_with_decimal_point_is_bad_but_not_fatal() {
        let out = tokenize("0x1.5 next", "<test>").unwrap();
        let bad: Vec<_> = out.tokens.iter().filter(|t| t.is(TokenKind::Bad)).collect();
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].lexeme, "0x1.5");
        assert_eq!(out.diagnostics.len(), 1);
        let diagnostic = out.diagnostics.iter().next().unwrap();
        assert_eq!(
            diagnostic.message,
            "only base-10 numbers may include a decimal point"
        );
        assert_eq!(diagnostic.location.offset, 0);
        assert_eq!(out.tokens[1].kind, TokenKind::Identifier);
        assert_eq!(out.tokens[1].lexeme, "next");
    }

    #[test]
    fn missing_exponent_sign_is_a_diagnostic() {
        let out = tokenize("1.5e10", "<test>").unwrap();
        assert_eq!(out.tokens[0].kind, TokenKind::Bad);
        assert_eq!(out.tokens[0].lexeme, "1.5e10");
        assert_eq!(out.diagnostics.len(), 1);
    }

    #[test]
    fn trailing_garbage_is_consumed() {
        let out = tokenize("123abc (x)", "<test>").unwrap();
        assert_eq!(out.tokens[0].kind, TokenKind::Bad);
        assert_eq!(out.tokens[0].lexeme, "123abc");
        assert_eq!(out.tokens[1].kind, TokenKind::LParen);
        assert_eq!(out.diagnostics.len(), 1);
    }

    #[test]
    fn empty_radix_and_fraction_are_bad() {
        let out = tokenize("0x 1.", "<test>").unwrap();
        assert_eq!(out.tokens[0].kind, TokenKind::Bad);
        assert_eq!(out.tokens[1].kind, TokenKind::Bad);
        assert_eq!(out.diagnostics.len(), 2);
    }

    #[test]
    fn number_before_optional_member() {
        use TokenKind::*;
        assert_eq!(kinds("1.?a"), [Integer, OptionalDot, Identifier, Eof]);
    }

    #[test]
    fn trivia_attaches_forward() {
        let out = tokenize("  a ; comment\n,b  ", "<test>").unwrap();
        let trivia: Vec<_> = out.tokens.iter().map(|t| t.trivia.as_str()).collect();
        assert_eq!(trivia, ["  ", " ; comment\n,", "  "]);
    }

    #[test]
    fn trivia_only_input() {
        let out = tokenize("; nothing here", "<test>").unwrap();
        assert_eq!(out.tokens.len(), 1);
        assert_eq!(out.tokens[0].kind, TokenKind::Eof);
        assert_eq!(out.tokens[0].trivia, "; nothing here");

        let out = tokenize("", "<test>").unwrap();
        assert_eq!(out.tokens.len(), 1);
    }

    #[test]
    fn locations_are_token_starts() {
        let out = tokenize("(a\n  bc)", "lib.ar").unwrap();
        let locs: Vec<_> = out
            .tokens
            .iter()
            .map(|t| (t.location.line, t.location.column, t.location.offset))
            .collect();
        assert_eq!(locs, [(1, 1, 0), (1, 2, 1), (2, 3, 5), (2, 5, 7), (2, 6, 8)]);
        assert_eq!(&*out.tokens[0].location.file, "lib.ar");
    }

    #[test]
    fn string_escapes() {
        let out = tokenize(r#""a\n\t\"b\\ \u03bb""#, "<test>").unwrap();
        let token = &out.tokens[0];
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.lexeme, r#""a\n\t\"b\\ \u03bb""#);
        assert_eq!(token.value.as_deref(), Some("a\n\t\"b\\ λ"));
    }

    #[test]
    fn invalid_unicode_escape_is_a_diagnostic() {
        let out = tokenize(r#""\u""#, "<test>").unwrap();
        assert_eq!(out.tokens[0].kind, TokenKind::String);
        assert_eq!(out.tokens[0].value.as_deref(), Some("\u{fffd}"));
        assert_eq!(out.diagnostics.len(), 1);
    }

    #[test]
    fn multiline_strings() {
        let input = "\"\"\"line one\n\"quoted\" \\t\n\"\"\" x";
        let out = tokenize(input, "<test>").unwrap();
        let token = &out.tokens[0];
        assert_eq!(token.kind, TokenKind::MultilineString);
        assert_eq!(token.lexeme, "\"\"\"line one\n\"quoted\" \\t\n\"\"\"");
        assert_eq!(token.value.as_deref(), Some("line one\n\"quoted\" \t\n"));
        assert_eq!(out.tokens[1].lexeme, "x");
    }

    #[test]
    fn extra_quotes_fold_into_multiline_close() {
        let out = tokenize("\"\"\"a\"\"\"\" x", "<test>").unwrap();
        let token = &out.tokens[0];
        assert_eq!(token.kind, TokenKind::MultilineString);
        assert_eq!(token.lexeme, "\"\"\"a\"\"\"\"");
        assert_eq!(token.value.as_deref(), Some("a"));
        assert_eq!(out.tokens[1].lexeme, "x");
        assert_eq!(out.tokens[1].trivia, " ");
    }

    #[test]
    fn unknown_escapes_decode_to_nothing() {
        let out = tokenize(r#""a\qb""#, "<test>").unwrap();
        let token = &out.tokens[0];
        assert_eq!(token.lexeme, r#""a\qb""#);
        assert_eq!(token.value.as_deref(), Some("ab"));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn short_strings_at_end_of_input() {
        let out = tokenize(r#""""#, "<test>").unwrap();
        assert_eq!(out.tokens[0].kind, TokenKind::String);
        assert_eq!(out.tokens[0].value.as_deref(), Some(""));

        let out = tokenize(r#""a""#, "<test>").unwrap();
        assert_eq!(out.tokens[0].value.as_deref(), Some("a"));

        let out = tokenize(r#""""""""#, "<test>").unwrap();
        assert_eq!(out.tokens[0].kind, TokenKind::MultilineString);
        assert_eq!(out.tokens[0].value.as_deref(), Some(""));
    }

    #[test]
    fn unterminated_string_is_fatal() {
        match tokenize("(x \"abc", "<test>") {
            Err(ReadErr::Incomplete { location, .. }) => {
                assert_eq!(location.offset, 3);
                assert_eq!(location.column, 4);
            }
            other => panic!("expected incomplete error, got {:?}", other),
        }
    }

    #[test]
    fn newline_in_string_is_fatal() {
        let input = "(\n\"hello1\"\n \"hello\n\n)";
        match tokenize(input, "<test>") {
            Err(ReadErr::Error { location, .. }) => {
                assert_eq!(location.line, 3);
                assert_eq!(location.column, 2);
            }
            other => panic!("expected terminal error, got {:?}", other),
        }
    }

    #[test]
    fn unterminated_multiline_string_is_fatal() {
        let got = tokenize("\"\"\"never\nends\"\"", "<test>");
        assert!(matches!(got, Err(ReadErr::Incomplete { .. })), "{:?}", got);
    }

    #[test]
    fn unknown_character_is_fatal() {
        match tokenize("a\n  @", "<test>") {
            Err(ReadErr::Error { location, message }) => {
                assert_eq!((location.line, location.column), (2, 3));
                assert!(message.contains('@'), "{}", message);
            }
            other => panic!("expected terminal error, got {:?}", other),
        }
    }
}
