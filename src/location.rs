//! Location support.

use std::sync::Arc;

/// Position in an input stream, captured at the start of a token or form.
///
/// Lines and columns are 1-indexed; `offset` is the byte offset into the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub file: Arc<str>,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize, file: Arc<str>) -> Self {
        SourceLocation {
            line,
            column,
            offset,
            file,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.file, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::SourceLocation;

    #[test]
    fn display_names_file_and_position() {
        let loc = SourceLocation::new(3, 14, 40, "lib/core.ar".into());
        assert_eq!(loc.to_string(), "lib/core.ar at 3:14");
    }
}
