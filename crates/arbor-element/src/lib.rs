//! Arbor Element - Element descriptors
//!
//! Lightweight, immutable descriptions of nodes in a virtual UI tree.
//! An [`Element`] is a cheap `Arc` handle; cloning one never copies props.
//!
//! Children and prop values share one tagged union, [`Value`], which
//! covers everything that may appear in a children position: empty
//! values, primitives, elements, ordered lists and lazily-produced
//! sequences.

mod element;
mod factory;
mod props;
mod value;

pub use element::{Component, Element, ElementType, Key, Ref};
pub use factory::{
    Factory, clone_element, clone_element_observed, create_element, create_element_observed,
    create_factory, is_valid_element, try_create_element,
};
pub use props::{CHILDREN, ElementConfig, Props, ReservedProp, ReservedPropObserver};
pub use value::{Callback, LazySeq, Value};

/// Element construction error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementError {
    #[error(
        "element type is invalid: expected a tag name or a component definition but got: {found}"
    )]
    InvalidType { found: String },
}
