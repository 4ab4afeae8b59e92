//! Arbor
//!
//! Identity and traversal core for declarative UI trees.
//!
//! # Goals
//! - Immutable, cheap-to-clone element descriptors
//! - Deterministic depth-first traversal of arbitrarily nested children
//! - Key-paths that are unique within a traversal, by construction
//!
//! # Example
//! ```rust
//! use arbor::{Arbor, Config, ElementConfig, Value, children};
//!
//! let arbor = Arbor::new(Config::production());
//! let list = arbor.create_element(
//!     "ul",
//!     ElementConfig::new(),
//!     vec![Value::list([Value::from("a"), Value::from("b")])],
//! );
//! let kids = list.children().cloned().unwrap_or_default();
//! assert_eq!(children::count(&kids).unwrap(), 2);
//! ```

mod config;
mod runtime;

pub use config::Config;
pub use runtime::{Arbor, ElementFactory, Error, Result};

pub use arbor_element::{
    CHILDREN, Callback, Component, Element, ElementConfig, ElementError, ElementType, Factory,
    Key, LazySeq, Props, Ref, Value, clone_element, create_element, create_factory,
    is_valid_element, try_create_element,
};

// Re-export sub-crates for advanced usage
pub use arbor_children as children;
pub use arbor_element as element;
#[cfg(feature = "validation")]
pub use arbor_validate as validate;

pub use arbor_children::ChildrenError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
