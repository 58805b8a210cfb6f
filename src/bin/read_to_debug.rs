//! Read a source file into:
//! - the reconstructed source on stdout, i.e. a mirror of the input
//! - Debug on stderr: every form and diagnostic as the reader sees them.
//!
//! ```ignore
//! <input.lisp read_to_debug
//! ```

use std::io::{Read, Write};

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let mut input = String::new();
    std::io::stdin().lock().read_to_string(&mut input)?;

    let output = arith_reader::read_str(&input, "<stdin>")?;

    for form in output.program() {
        eprintln!("{:?}", form);
    }
    for diagnostic in &output.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }
    std::io::stdout().lock().write_all(output.source().as_bytes())
}
