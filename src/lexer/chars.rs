//! Character classes for the lexer.
//!
//! The symbol classes include Unicode letters and numbers, so they are regexes,
//! compiled once and shared for the life of the process.

/// Words the language reserves; identifiers spelled like these lex as `Reserved`.
pub const RESERVED: &[&str] = &[
    "and",
    "begin",
    "catch",
    "cond",
    "def",
    "defmacro",
    "do",
    "export",
    "finally",
    "fn",
    "for",
    "if",
    "import",
    "let",
    "loop",
    "module",
    "not",
    "or",
    "quasiquote",
    "quote",
    "set!",
    "splice-unquote",
    "throw",
    "try",
    "type",
    "unquote",
    "var",
    "while",
];

pub fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

mod regex {
    use regex::Regex;
    use std::sync::OnceLock;

    pub(super) fn symbol_start() -> &'static Regex {
        static MATCH: OnceLock<Regex> = OnceLock::new();
        MATCH.get_or_init(|| {
            Regex::new(r"\A[=<>%|\\/*\p{L}_$!+\-]\z")
                .expect("could not compile regex for symbol start")
        })
    }

    pub(super) fn symbol_char() -> &'static Regex {
        static MATCH: OnceLock<Regex> = OnceLock::new();
        MATCH.get_or_init(|| {
            Regex::new(r"\A[=@~<>%&|?\\/^*#'\p{L}\p{N}_$!+\-]\z")
                .expect("could not compile regex for symbol character")
        })
    }
}

fn matches(re: &::regex::Regex, ch: char) -> bool {
    let mut buf = [0u8; 4];
    re.is_match(ch.encode_utf8(&mut buf))
}

pub fn is_symbol_start(ch: char) -> bool {
    matches(regex::symbol_start(), ch)
}

pub fn is_symbol_char(ch: char) -> bool {
    matches(regex::symbol_char(), ch)
}

/// Commas count as whitespace.
pub fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace() || ch == ','
}

pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

pub fn is_oct_digit(ch: char) -> bool {
    matches!(ch, '0'..='7')
}

pub fn is_bin_digit(ch: char) -> bool {
    matches!(ch, '0' | '1')
}

pub fn is_alphanumeric(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognize_symbols() -> Result<(), String> {
        for sym in ["hello", "tree->list", "operator<>", "empty?", "IMPORTANT!", "λ", "*ns*"] {
            let mut chars = sym.chars();
            let first = chars.next().unwrap();
            if !is_symbol_start(first) || !chars.all(is_symbol_char) {
                return Err(format!("did not recognize symbol {}", sym));
            }
        }
        Ok(())
    }

    #[test]
    fn delimiters_are_not_symbol_chars() {
        for ch in ['(', ')', '[', ']', '{', '}', '"', ';', ' ', ',', '.', ':'] {
            assert!(!is_symbol_char(ch), "{ch:?} is a symbol char");
            assert!(!is_symbol_start(ch), "{ch:?} is a symbol start");
        }
    }

    #[test]
    fn some_symbol_chars_cannot_start() {
        for ch in ['@', '~', '#', '\'', '?', '^', '&', '7'] {
            assert!(is_symbol_char(ch), "{ch:?} is not a symbol char");
            assert!(!is_symbol_start(ch), "{ch:?} is a symbol start");
        }
    }

    #[test]
    fn commas_are_whitespace() {
        assert!(is_whitespace(','));
        assert!(is_whitespace('\n'));
        assert!(!is_whitespace(';'));
    }
}
