//! Graphviz rendering of read forms.

use dot_writer::{Attributes, DotWriter, Scope, Shape};

use super::{Cons, Form, MemberAccess, Tail};
use crate::lexer::Token;

/// Source of unique node names.
#[derive(Default)]
struct NodeIds(usize);

impl NodeIds {
    fn next(&mut self, prefix: &str) -> String {
        self.0 += 1;
        format!("{}_{}", prefix, self.0)
    }
}

/// Escape text for use inside a record label.
fn escape_record(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '{' | '}' | '|' | '<' | '>' | '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render forms into a Graphviz graph: atoms as records, pair cells as
/// head/tail tables, member accesses as object/property tables.
pub fn render_forms<'a>(forms: impl IntoIterator<Item = &'a Form>) -> Vec<u8> {
    let mut outbuf = Vec::new();
    {
        let mut writer = DotWriter::from(&mut outbuf);
        let mut graph = writer.digraph();
        let mut ids = NodeIds::default();
        for form in forms {
            render_form(&mut graph, &mut ids, form);
        }
    }
    outbuf
}

/// Add the form's nodes; returns the name of its root node.
fn render_form(graph: &mut Scope<'_, '_>, ids: &mut NodeIds, form: &Form) -> String {
    match form {
        Form::Token(token) => render_token(graph, ids, token),
        Form::List(list) => render_cell(graph, ids, &list.cells),
        Form::Member(member) => render_member(graph, ids, member),
    }
}

fn render_token(graph: &mut Scope<'_, '_>, ids: &mut NodeIds, token: &Token) -> String {
    let id = ids.next("token");
    let mut node = graph.node_named(&id);
    node.set_shape(Shape::Record);
    node.set_label(&format!(
        "{{{}|{}}}",
        token.kind,
        escape_record(token.source_text())
    ));
    id
}

/// Renders the chain starting at `first` as linked cells; returns the first cell's name.
fn render_cell(graph: &mut Scope<'_, '_>, ids: &mut NodeIds, first: &Cons<Form>) -> String {
    let mut heads = Vec::new();
    let mut cell = first;
    let improper = loop {
        heads.push(render_form(graph, ids, cell.head()));
        match cell.tail() {
            Tail::Cons(next) => cell = next,
            Tail::Nil => break None,
            Tail::Improper(value) => break Some(render_form(graph, ids, value)),
        }
    };

    // Built back to front, so each cell can point at the one after it.
    let mut tail_name = improper;
    for head_name in heads.into_iter().rev() {
        let id = ids.next("cell");
        let mut node = graph.node_named(&id);
        node.set_shape(Shape::None);
        let tail_text = if tail_name.is_some() { "tail" } else { "nil" };
        let label = format!(
            "<{}>",
            maud::html!(
                table border="0" cellborder="1" cellspacing="0" {
                    tr {
                        td port="head" { "head" }
                        td port="tail" { (tail_text) }
                    }
                }
            )
            .into_string()
        );
        node.set_html(&label);
        let head_port = node.id().port("head");
        let tail_port = node.id().port("tail");
        std::mem::drop(node);

        graph.edge(head_port, head_name);
        if let Some(tail_name) = tail_name {
            graph.edge(tail_port, tail_name);
        }
        tail_name = Some(id);
    }
    tail_name.unwrap_or_default()
}

fn render_member(graph: &mut Scope<'_, '_>, ids: &mut NodeIds, member: &MemberAccess) -> String {
    let object_name = render_form(graph, ids, &member.object);
    let property_name = render_form(graph, ids, &member.property);

    let id = ids.next("member");
    let mut node = graph.node_named(&id);
    node.set_shape(Shape::None);
    let operator = if member.optional { ".?" } else { "." };
    let label = format!(
        "<{}>",
        maud::html!(
            table border="0" cellborder="1" cellspacing="0" {
                tr { td colspan="2" border="0" { (operator) } }
                tr {
                    td port="object" { "object" }
                    td port="property" { "property" }
                }
            }
        )
        .into_string()
    );
    node.set_html(&label);
    let object_port = node.id().port("object");
    let property_port = node.id().port("property");
    std::mem::drop(node);

    graph.edge(object_port, object_name);
    graph.edge(property_port, property_name);
    id
}
