//! Render a read, unexpanded tree as Graphviz.
//!
//! Usage:
//!
//! ```ignore
//! <input.lisp read_to_graphviz | dot -T png >output.png
//! ```

use std::io::{Read, Write};

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let mut input = String::new();
    std::io::stdin().lock().read_to_string(&mut input)?;

    let output = arith_reader::read_str(&input, "<stdin>")?;

    let graphviz = arith_reader::render_forms(output.program());
    std::io::stdout().lock().write_all(&graphviz)
}
