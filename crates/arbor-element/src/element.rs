//! Element descriptor
//!
//! Memory layout:
//! - `Element` is a single `Arc` pointer (8 bytes), clones are refcount bumps
//! - Props are shared between an element and its clones until overridden

use crate::value::number_to_string;
use crate::{Callback, ElementError, Props, Value};
use std::fmt;
use std::sync::Arc;

/// Caller-supplied sibling identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Arc<str>);

impl Key {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Key(key.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key(Arc::from(s))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key(Arc::from(s))
    }
}

impl From<f64> for Key {
    fn from(n: f64) -> Self {
        Key(Arc::from(number_to_string(n)))
    }
}

macro_rules! key_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Key {
            fn from(n: $t) -> Self {
                Key(Arc::from(n.to_string()))
            }
        })*
    };
}

key_from_int!(i32, i64, u32, u64, usize);

/// Handle for imperative access, owned by whoever renders the tree
#[derive(Debug, Clone, PartialEq)]
pub enum Ref {
    Named(Arc<str>),
    Callback(Callback),
}

impl Ref {
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Ref::Named(name.into())
    }
}

/// Component definition
///
/// Components compare by identity: two definitions with the same name are
/// still different types.
#[derive(Debug)]
pub struct Component {
    name: Arc<str>,
    default_props: Props,
}

impl Component {
    pub fn new(name: impl Into<Arc<str>>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            default_props: Props::default(),
        })
    }

    /// Component whose elements fall back to `defaults` for absent props
    pub fn with_default_props(name: impl Into<Arc<str>>, defaults: Props) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            default_props: defaults,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_props(&self) -> &Props {
        &self.default_props
    }
}

/// What kind of node an element describes
#[derive(Debug, Clone)]
pub enum ElementType {
    /// Host tag such as `div`
    Tag(Arc<str>),
    Component(Arc<Component>),
}

impl ElementType {
    pub fn tag(name: impl Into<Arc<str>>) -> Self {
        ElementType::Tag(name.into())
    }

    /// Name shown in diagnostics
    pub fn display_name(&self) -> &str {
        match self {
            ElementType::Tag(name) => name,
            ElementType::Component(c) => c.name(),
        }
    }

    /// A blank tag name is the "missing type" case
    pub fn validate(&self) -> Result<(), ElementError> {
        match self {
            ElementType::Tag(name) if name.trim().is_empty() => Err(ElementError::InvalidType {
                found: format!("{name:?}"),
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn default_props(&self) -> Option<&Props> {
        match self {
            ElementType::Component(c) if !c.default_props().is_empty() => Some(c.default_props()),
            _ => None,
        }
    }
}

impl PartialEq for ElementType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ElementType::Tag(a), ElementType::Tag(b)) => a == b,
            (ElementType::Component(a), ElementType::Component(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for ElementType {
    fn from(s: &str) -> Self {
        ElementType::Tag(Arc::from(s))
    }
}

impl From<String> for ElementType {
    fn from(s: String) -> Self {
        ElementType::Tag(Arc::from(s))
    }
}

impl From<Arc<Component>> for ElementType {
    fn from(c: Arc<Component>) -> Self {
        ElementType::Component(c)
    }
}

impl From<&Arc<Component>> for ElementType {
    fn from(c: &Arc<Component>) -> Self {
        ElementType::Component(Arc::clone(c))
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct ElementData {
    pub(crate) ty: ElementType,
    pub(crate) key: Option<Key>,
    pub(crate) ref_handle: Option<Ref>,
    pub(crate) props: Props,
}

/// Immutable element descriptor
///
/// Only the factory functions can build one, which is what makes
/// [`crate::is_valid_element`] impossible to spoof with a plain record.
#[derive(Clone, PartialEq)]
pub struct Element(Arc<ElementData>);

impl Element {
    pub(crate) fn from_data(data: ElementData) -> Self {
        Element(Arc::new(data))
    }

    #[inline]
    pub fn ty(&self) -> &ElementType {
        &self.0.ty
    }

    #[inline]
    pub fn key(&self) -> Option<&Key> {
        self.0.key.as_ref()
    }

    #[inline]
    pub fn ref_handle(&self) -> Option<&Ref> {
        self.0.ref_handle.as_ref()
    }

    #[inline]
    pub fn props(&self) -> &Props {
        &self.0.props
    }

    /// Shortcut for `props().children()`
    pub fn children(&self) -> Option<&Value> {
        self.0.props.children()
    }

    /// Same element, different key. Everything else is shared.
    pub fn with_key(&self, key: impl Into<Key>) -> Element {
        Element::from_data(ElementData {
            ty: self.0.ty.clone(),
            key: Some(key.into()),
            ref_handle: self.0.ref_handle.clone(),
            props: self.0.props.clone(),
        })
    }

    /// Whether both handles point at the same descriptor
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Element");
        s.field("type", &self.0.ty.display_name());
        if let Some(key) = &self.0.key {
            s.field("key", &key.as_str());
        }
        if let Some(r) = &self.0.ref_handle {
            s.field("ref", r);
        }
        s.field("props", &self.0.props).finish()
    }
}
