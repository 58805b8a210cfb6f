//! Reader for a small Lisp dialect: source text to a lossless concrete syntax tree.
//!
//! ```
//! let output = arith_reader::read_str("(def x 'y) ; done\n", "<doc>").unwrap();
//! assert_eq!(output.program().len(), 1);
//! assert_eq!(output.source(), "(def x 'y) ; done\n");
//! ```

pub mod data;
pub mod diagnostics;
pub mod lexer;
pub mod location;
pub mod reader;

pub use data::{Cons, Form};
pub use diagnostics::{Diagnostic, DiagnosticBag};
pub use lexer::{tokenize, LexOutput, Token, TokenKind};
pub use location::SourceLocation;
pub use reader::{read, ReadErr, ReadOutput, ReadResult};

#[cfg(feature = "render")]
pub use data::render::render_forms;

/// Tokenize and read `source` in one step.
///
/// `file` names the source in locations and error messages.
pub fn read_str(source: &str, file: &str) -> ReadResult<ReadOutput> {
    read(tokenize(source, file)?)
}
