//! Children and prop values
//!
//! [`Value`] is the discriminated union the traversal engine dispatches on
//! once per nesting level.

use crate::Element;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// A child or prop value
#[derive(Clone, Default, PartialEq)]
pub enum Value {
    /// null / absent
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Str(Arc<str>),
    Element(Element),
    /// Ordered sequence
    List(Arc<[Value]>),
    /// Lazily-produced sequence
    Lazy(LazySeq),
    /// Mapping without sequence semantics (never a valid child)
    Record(Arc<BTreeMap<Arc<str>, Value>>),
    /// Function-valued prop such as an event handler
    Callback(Callback),
}

impl Value {
    /// Build a list value
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a record value
    pub fn record<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Arc<str>>,
        V: Into<Value>,
    {
        Value::Record(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null and booleans render nothing
    #[inline]
    pub fn is_empty_leaf(&self) -> bool {
        matches!(self, Value::Null | Value::Bool(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Value::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short description used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Element(_) => "element",
            Value::List(_) => "list",
            Value::Lazy(_) => "lazy sequence",
            Value::Record(_) => "object",
            Value::Callback(_) => "function",
        }
    }
}

/// Format a number the way it reads when coerced to a string key
pub(crate) fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({})", number_to_string(*n)),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Element(e) => fmt::Debug::fmt(e, f),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Lazy(seq) => fmt::Debug::fmt(seq, f),
            Value::Record(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Callback(cb) => fmt::Debug::fmt(cb, f),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Number(n as f64)
            }
        })*
    };
}

value_from_int!(i32, i64, u32, u64, usize);

impl From<Element> for Value {
    fn from(e: Element) -> Self {
        Value::Element(e)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Arc::from(items))
    }
}

impl From<LazySeq> for Value {
    fn from(seq: LazySeq) -> Self {
        Value::Lazy(seq)
    }
}

impl From<Callback> for Value {
    fn from(cb: Callback) -> Self {
        Value::Callback(cb)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

type BoxedIter = Box<dyn Iterator<Item = Value> + Send>;
type IterFactory = dyn Fn() -> BoxedIter + Send + Sync;

enum LazySource {
    /// Produces a fresh iterator on every drain
    Restartable(Box<IterFactory>),
    /// Yields its items once, then stays exhausted
    Once(Mutex<Option<BoxedIter>>),
}

/// Lazily-produced child sequence
///
/// The traversal engine drains a sequence exactly once per call. A
/// sequence built with [`LazySeq::once`] behaves like a spent generator on
/// every drain after the first.
#[derive(Clone)]
pub struct LazySeq(Arc<LazySource>);

impl LazySeq {
    /// Restartable sequence backed by an iterator factory
    pub fn new<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        let factory: Box<IterFactory> = Box::new(move || -> BoxedIter {
            Box::new(factory().into_iter())
        });
        LazySeq(Arc::new(LazySource::Restartable(factory)))
    }

    /// One-shot sequence
    pub fn once<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        let iter: BoxedIter = Box::new(iter.into_iter());
        LazySeq(Arc::new(LazySource::Once(Mutex::new(Some(iter)))))
    }

    /// Whether draining leaves the sequence reusable
    pub fn is_restartable(&self) -> bool {
        matches!(*self.0, LazySource::Restartable(_))
    }

    /// Take an iterator over the sequence's items
    pub fn drain(&self) -> BoxedIter {
        match &*self.0 {
            LazySource::Restartable(factory) => factory(),
            LazySource::Once(slot) => {
                let taken = slot.lock().unwrap_or_else(|e| e.into_inner()).take();
                match taken {
                    Some(iter) => iter,
                    None => Box::new(std::iter::empty()),
                }
            }
        }
    }
}

impl PartialEq for LazySeq {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for LazySeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.is_restartable() { "restartable" } else { "once" };
        write!(f, "LazySeq({mode})")
    }
}

type CallbackFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// Function value; compares by identity
#[derive(Clone)]
pub struct Callback(Arc<CallbackFn>);

impl Callback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Callback(Arc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Arc::as_ptr(&self.0))
    }
}
