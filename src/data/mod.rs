//! Data the reader produces.
//!
//! - `Cons`: the two-slot pair cell, used as a general-purpose list.
//! - `Form`: a concrete syntax tree node, built from tokens, pair-cell lists
//!   and member accesses.

mod cons;
mod form;
#[cfg(feature = "render")]
pub mod render;

pub use cons::{Cons, ImproperListError, Iter, Tail};
pub use form::{Form, List, MemberAccess};
