//! Non-fatal problems found while reading.
//!
//! A diagnostic never stops a phase; the offending text is still handed on
//! (for the lexer, as a `Bad` token). Bags from successive phases are merged
//! by concatenation.

use crate::location::SourceLocation;

/// Maximum number of characters kept on either side of an error position.
const SNIPPET_RADIUS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    /// Bounded text snippet around the error.
    pub source_span: String,
    pub location: SourceLocation,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} in {}: {:?}",
            self.message, self.location, self.source_span
        )
    }
}

/// Append-only, order-preserving collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Default::default()
    }

    /// Record a diagnostic, cutting the snippet out of `source` around the location.
    pub fn add(&mut self, message: impl Into<String>, source: &str, location: SourceLocation) {
        let diagnostic = Diagnostic {
            message: message.into(),
            source_span: snippet(source, location.offset),
            location,
        };
        tracing::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Append every diagnostic of `other`, in order, after ours.
    pub fn merge(&mut self, other: DiagnosticBag) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticBag {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl IntoIterator for DiagnosticBag {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

/// Text around `offset`: up to SNIPPET_RADIUS characters before and after,
/// never crossing a line break.
pub(crate) fn snippet(source: &str, offset: usize) -> String {
    let offset = offset.min(source.len());
    // Offsets always come from the lexer, but don't split a character if one doesn't.
    let offset = (0..=offset)
        .rev()
        .find(|&i| source.is_char_boundary(i))
        .unwrap_or(0);
    let (before, after) = source.split_at(offset);

    let mut start = before.len();
    for (count, (i, ch)) in before.char_indices().rev().enumerate() {
        if ch == '\n' || count == SNIPPET_RADIUS {
            break;
        }
        start = i;
    }
    let end = after
        .char_indices()
        .take(SNIPPET_RADIUS)
        .find(|(_, ch)| *ch == '\n')
        .map(|(i, _)| i)
        .unwrap_or_else(|| {
            after
                .char_indices()
                .nth(SNIPPET_RADIUS)
                .map(|(i, _)| i)
                .unwrap_or(after.len())
        });

    format!("{}{}", &before[start..], &after[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(offset: usize) -> SourceLocation {
        SourceLocation::new(1, offset + 1, offset, "<test>".into())
    }

    #[test]
    fn merge_concatenates_in_order() {
        let mut lexer = DiagnosticBag::new();
        lexer.add("first", "abc", loc(0));
        lexer.add("first", "abc", loc(0));
        let mut reader = DiagnosticBag::new();
        reader.add("second", "abc", loc(1));

        lexer.merge(reader);
        let messages: Vec<_> = lexer.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, ["first", "first", "second"]);
    }

    #[test]
    fn snippet_stays_on_one_line() {
        let source = "(def a 1)\n(def b 0x1.5)\n(def c 3)";
        let offset = source.find("0x").unwrap();
        assert_eq!(snippet(source, offset), "(def b 0x1.5)");
    }

    #[test]
    fn snippet_is_bounded() {
        let source = "x".repeat(100);
        let got = snippet(&source, 50);
        assert_eq!(got.len(), 2 * SNIPPET_RADIUS);
    }

    #[test]
    fn snippet_at_end_of_input() {
        assert_eq!(snippet("abc", 3), "abc");
        assert_eq!(snippet("", 0), "");
    }
}
