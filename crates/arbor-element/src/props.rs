//! Props and element configuration

use crate::value::number_to_string;
use crate::{Key, Ref, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Reserved name holding nested children
pub const CHILDREN: &str = "children";

/// Config names hoisted onto the element instead of props
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedProp {
    Key,
    Ref,
}

impl ReservedProp {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "key" => Some(ReservedProp::Key),
            "ref" => Some(ReservedProp::Ref),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReservedProp::Key => "key",
            ReservedProp::Ref => "ref",
        }
    }
}

/// Notified when code reads `key` or `ref` through props
pub trait ReservedPropObserver: Send + Sync {
    fn reserved_prop_read(&self, element: &str, prop: ReservedProp);
}

struct ReservedGuard {
    element: Arc<str>,
    has_key: bool,
    has_ref: bool,
    observer: Arc<dyn ReservedPropObserver>,
}

/// Immutable attribute map
///
/// `key` and `ref` are never stored here; reading them returns `None`.
#[derive(Clone, Default)]
pub struct Props {
    entries: Arc<BTreeMap<Arc<str>, Value>>,
    guard: Option<Arc<ReservedGuard>>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_map(entries: BTreeMap<Arc<str>, Value>) -> Self {
        Self {
            entries: Arc::new(entries),
            guard: None,
        }
    }

    /// Attach the observer that watches for reserved-name reads
    pub(crate) fn guarded(
        mut self,
        element: &str,
        key: Option<&Key>,
        ref_handle: Option<&Ref>,
        observer: Arc<dyn ReservedPropObserver>,
    ) -> Self {
        if key.is_some() || ref_handle.is_some() {
            self.guard = Some(Arc::new(ReservedGuard {
                element: Arc::from(element),
                has_key: key.is_some(),
                has_ref: ref_handle.is_some(),
                observer,
            }));
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        if let Some(reserved) = ReservedProp::from_name(name) {
            self.note_reserved_read(reserved);
            return None;
        }
        self.entries.get(name)
    }

    /// The reserved children entry
    pub fn children(&self) -> Option<&Value> {
        self.entries.get(CHILDREN)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }

    /// New props with one entry replaced
    pub fn with(&self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Props {
        let name = name.into();
        if ReservedProp::from_name(&name).is_some() {
            return self.clone();
        }
        let mut entries = (*self.entries).clone();
        entries.insert(name, value.into());
        Props::from_map(entries)
    }

    /// Shallow merge, later entries win
    pub fn merged(&self, other: &Props) -> Props {
        let mut entries = (*self.entries).clone();
        for (k, v) in other.entries.iter() {
            entries.insert(Arc::clone(k), v.clone());
        }
        Props::from_map(entries)
    }

    pub(crate) fn entries(&self) -> &BTreeMap<Arc<str>, Value> {
        &self.entries
    }

    fn note_reserved_read(&self, prop: ReservedProp) {
        let Some(guard) = &self.guard else {
            return;
        };
        let present = match prop {
            ReservedProp::Key => guard.has_key,
            ReservedProp::Ref => guard.has_ref,
        };
        if present {
            guard.observer.reserved_prop_read(&guard.element, prop);
        }
    }
}

impl PartialEq for Props {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries) || self.entries == other.entries
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Props
where
    K: Into<Arc<str>>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| ReservedProp::from_name(k).is_none())
            .collect();
        Props::from_map(entries)
    }
}

/// Configuration passed to the factory
///
/// `key` and `ref` are hoisted onto the element; every other entry becomes
/// a prop.
#[derive(Debug, Clone, Default)]
pub struct ElementConfig {
    key: Option<Key>,
    ref_handle: Option<Ref>,
    props: BTreeMap<Arc<str>, Value>,
}

impl ElementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn ref_handle(mut self, r: Ref) -> Self {
        self.ref_handle = Some(r);
        self
    }

    /// Set a prop. `key` and `ref` are routed to their dedicated fields.
    ///
    /// Keys coerce from strings, numbers and booleans. A ref is named by a
    /// string or number, or wraps a callback. Any other value leaves the
    /// key or ref unset.
    pub fn prop(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match ReservedProp::from_name(&name) {
            Some(ReservedProp::Key) => {
                if let Some(key) = key_from_value(&value) {
                    self.key = Some(key);
                }
            }
            Some(ReservedProp::Ref) => match value {
                Value::Str(name) => self.ref_handle = Some(Ref::Named(name)),
                Value::Number(n) => self.ref_handle = Some(Ref::named(number_to_string(n))),
                Value::Callback(cb) => self.ref_handle = Some(Ref::Callback(cb)),
                _ => {}
            },
            None => {
                self.props.insert(name, value);
            }
        }
        self
    }

    /// Set the children prop directly
    pub fn children(self, children: impl Into<Value>) -> Self {
        self.prop(CHILDREN, children)
    }

    pub fn get_key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn get_ref(&self) -> Option<&Ref> {
        self.ref_handle.as_ref()
    }

    /// The `children` entry set through [`ElementConfig::children`] or `prop`
    pub fn get_children(&self) -> Option<&Value> {
        self.props.get(CHILDREN)
    }

    pub fn props(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.props.iter().map(|(k, v)| (&**k, v))
    }

    pub(crate) fn into_parts(self) -> (Option<Key>, Option<Ref>, BTreeMap<Arc<str>, Value>) {
        (self.key, self.ref_handle, self.props)
    }
}

fn key_from_value(value: &Value) -> Option<Key> {
    match value {
        Value::Str(s) => Some(Key::new(Arc::clone(s))),
        Value::Number(n) => Some(Key::from(number_to_string(*n))),
        Value::Bool(b) => Some(Key::from(b.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Reads(Mutex<Vec<(String, ReservedProp)>>);

    impl ReservedPropObserver for Reads {
        fn reserved_prop_read(&self, element: &str, prop: ReservedProp) {
            self.0.lock().unwrap().push((element.to_string(), prop));
        }
    }

    #[test]
    fn test_config_hoists_reserved_names() {
        let config = ElementConfig::new()
            .prop("key", 3)
            .prop("ref", "input")
            .prop("className", "box");

        assert_eq!(config.get_key().map(Key::as_str), Some("3"));
        assert_eq!(config.get_ref(), Some(&Ref::named("input")));
        assert_eq!(config.props().count(), 1);
    }

    #[test]
    fn test_ref_coercion() {
        assert_eq!(ElementConfig::new().prop("ref", 4).get_ref(), Some(&Ref::named("4")));

        let cb = crate::Callback::new(|_| Value::Null);
        let config = ElementConfig::new().prop("ref", cb.clone());
        assert_eq!(config.get_ref(), Some(&Ref::Callback(cb)));

        assert_eq!(ElementConfig::new().prop("ref", true).get_ref(), None);
        assert_eq!(ElementConfig::new().prop("ref", Value::Null).get_ref(), None);
    }

    #[test]
    fn test_props_never_expose_key() {
        let props: Props = [("key", "a"), ("title", "t")].into_iter().collect();
        assert_eq!(props.len(), 1);
        assert!(props.get("key").is_none());
        assert_eq!(props.get("title").and_then(Value::as_str), Some("t"));
    }

    #[test]
    fn test_with_and_merged_leave_source_untouched() {
        let base: Props = [("a", 1), ("b", 2)].into_iter().collect();
        let changed = base.with("a", 10);
        assert_eq!(base.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(changed.get("a"), Some(&Value::Number(10.0)));

        let over: Props = [("b", 20), ("c", 30)].into_iter().collect();
        let merged = base.merged(&over);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("b"), Some(&Value::Number(20.0)));
    }

    #[test]
    fn test_guard_reports_only_present_fields() {
        let reads = Arc::new(Reads::default());
        let props = Props::new().guarded("div", Some(&Key::from("k")), None, reads.clone());

        assert!(props.get("key").is_none());
        assert!(props.get("ref").is_none());

        let seen = reads.0.lock().unwrap();
        assert_eq!(seen.as_slice(), &[("div".to_string(), ReservedProp::Key)]);
    }
}
