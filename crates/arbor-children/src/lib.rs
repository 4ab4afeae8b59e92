//! Arbor Children - Traversal of nested children
//!
//! Walks any children value (single child, lists, nested lists, lazy
//! sequences) depth-first, left to right, and labels every leaf with a
//! key-path that is unique within the walk.
//!
//! Key-path grammar:
//! - `.` opens a path at the root, `:` separates nesting levels
//! - positional components are base-36 indices (`.0`, `.a`, `.10`)
//! - keyed components are `$` followed by the escaped key (`=` becomes
//!   `=0`, `:` becomes `=2`)
//! - a repeated key among siblings gets `=1` and its repeat count in base 36

mod children;
mod traverse;

pub use children::{KeyedChild, count, for_each, keyed, map, only, to_array};
pub use traverse::{SEPARATOR, SUBSEPARATOR, escape_key, traverse, try_traverse, unescape_key};

/// Children traversal error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChildrenError {
    #[error(
        "objects are not valid as a child (found: {found}). If you meant to render a collection of children, use a list instead"
    )]
    InvalidChild { found: String },

    #[error("expected to receive a single element child")]
    MultipleChildren,
}
