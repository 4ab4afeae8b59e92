//! Children utilities: map, for_each, count, to_array, keyed, only
//!
//! All of them sit on top of [`crate::try_traverse`]. Callbacks receive
//! the leaf and its traversal position; null and boolean leaves are
//! skipped but still take a position.

use crate::{ChildrenError, traverse, try_traverse};
use arbor_element::{Element, Value};

/// Map every non-empty leaf through `f`
///
/// Element results are re-keyed with the leaf's key-path so the output
/// can be used as a sibling list anywhere. A list result is flattened in
/// place; a null result is dropped. Returns `None` for null children.
pub fn map<F>(children: &Value, mut f: F) -> Result<Option<Vec<Value>>, ChildrenError>
where
    F: FnMut(&Value, usize) -> Value,
{
    if children.is_null() {
        return Ok(None);
    }
    let mut result = Vec::new();
    map_into(children, &mut result, None, &mut f)?;
    Ok(Some(result))
}

/// Call `f` on every non-empty leaf
pub fn for_each<F>(children: &Value, mut f: F) -> Result<(), ChildrenError>
where
    F: FnMut(&Value, usize),
{
    let mut position = 0;
    traverse(children, "", |child, _| {
        if !child.is_null() {
            f(child, position);
        }
        position += 1;
    })?;
    Ok(())
}

/// Number of leaves, empty ones included
pub fn count(children: &Value) -> Result<usize, ChildrenError> {
    traverse(children, "", |_, _| {})
}

/// Flatten children into one list, re-keying elements by key-path
pub fn to_array(children: &Value) -> Result<Vec<Value>, ChildrenError> {
    let mut result = Vec::new();
    map_into(children, &mut result, None, &mut |child: &Value, _: usize| child.clone())?;
    Ok(result)
}

/// A flattened leaf and its key-path
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedChild {
    pub key: String,
    pub value: Value,
}

impl KeyedChild {
    /// The value, with elements re-keyed to the key-path
    pub fn into_value(self) -> Value {
        match self.value {
            Value::Element(el) => Value::Element(el.with_key(self.key)),
            other => other,
        }
    }
}

/// Every non-empty leaf with its key-path, primitives included
pub fn keyed(children: &Value) -> Result<Vec<KeyedChild>, ChildrenError> {
    let mut result = Vec::new();
    traverse(children, "", |child, key| {
        if !child.is_null() {
            result.push(KeyedChild {
                key: key.to_string(),
                value: child.clone(),
            });
        }
    })?;
    Ok(result)
}

/// The single element child
///
/// Anything but a bare element fails, including a one-element list.
pub fn only(children: &Value) -> Result<&Element, ChildrenError> {
    children.as_element().ok_or(ChildrenError::MultipleChildren)
}

type MapFn<'a> = dyn FnMut(&Value, usize) -> Value + 'a;

fn map_into(
    children: &Value,
    out: &mut Vec<Value>,
    prefix: Option<&str>,
    f: &mut MapFn<'_>,
) -> Result<(), ChildrenError> {
    let escaped_prefix = match prefix {
        Some(p) => {
            let mut s = escape_slashes(p);
            s.push('/');
            s
        }
        None => String::new(),
    };

    let mut position = 0;
    try_traverse(children, "", |child, child_key| {
        let index = position;
        position += 1;
        if child.is_null() {
            return Ok(());
        }
        let mapped = f(child, index);
        push_mapped(out, mapped, child, child_key, &escaped_prefix)
    })?;
    Ok(())
}

fn push_mapped(
    out: &mut Vec<Value>,
    mapped: Value,
    child: &Value,
    child_key: &str,
    escaped_prefix: &str,
) -> Result<(), ChildrenError> {
    match mapped {
        Value::List(_) => map_into(&mapped, out, Some(child_key), &mut |c: &Value, _: usize| {
            c.clone()
        }),
        Value::Null => Ok(()),
        Value::Element(el) => {
            let mut key = String::from(escaped_prefix);
            // keep a key the callback introduced, so re-keyed results stay distinct
            if let Some(own) = el.key().filter(|k| !k.is_empty()) {
                if child.as_element().and_then(Element::key) != Some(own) {
                    key.push_str(&escape_slashes(own.as_str()));
                    key.push('/');
                }
            }
            key.push_str(child_key);
            out.push(Value::Element(el.with_key(key)));
            Ok(())
        }
        other => {
            out.push(other);
            Ok(())
        }
    }
}

/// Double the last slash of every run of slashes
fn escape_slashes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '/' && chars.peek() != Some(&'/') {
            out.push('/');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_element::{ElementConfig, Key, create_element};

    fn el(key: Option<&str>) -> Element {
        let config = match key {
            Some(k) => ElementConfig::new().key(k),
            None => ElementConfig::new(),
        };
        create_element("span", config, vec![])
    }

    fn keys(values: &[Value]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| v.as_element().and_then(Element::key).map(|k| k.to_string()))
            .collect()
    }

    #[test]
    fn test_escape_slashes() {
        assert_eq!(escape_slashes("a/b"), "a//b");
        assert_eq!(escape_slashes("a//b/"), "a///b//");
        assert_eq!(escape_slashes("plain"), "plain");
    }

    #[test]
    fn test_map_filters_null() {
        let children = Value::list([
            Value::from("a"),
            Value::from("b"),
            Value::Null,
            Value::from("c"),
        ]);
        let mapped = map(&children, |x, _| x.clone()).unwrap().unwrap();
        assert_eq!(mapped, vec![Value::from("a"), Value::from("b"), Value::from("c")]);
        assert_eq!(count(&children).unwrap(), 4);
    }

    #[test]
    fn test_map_null_children_is_none() {
        let mut calls = 0;
        assert_eq!(map(&Value::Null, |x, _| { calls += 1; x.clone() }).unwrap(), None);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_map_indices_follow_traversal_positions() {
        let children = Value::list([Value::from("a"), Value::Null, Value::from("b")]);
        let mut indices = Vec::new();
        map(&children, |x, i| {
            indices.push(i);
            x.clone()
        })
        .unwrap();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_map_rekeys_elements() {
        let children = Value::list([Value::from(el(Some("a"))), Value::from(el(None))]);
        let mapped = map(&children, |x, _| x.clone()).unwrap().unwrap();
        assert_eq!(keys(&mapped), vec![Some(".$a".to_string()), Some(".1".to_string())]);
    }

    #[test]
    fn test_map_keeps_callback_key() {
        let children = Value::list([Value::from(el(Some("a")))]);
        let mapped = map(&children, |_, _| Value::from(el(Some("x/y")))).unwrap().unwrap();
        assert_eq!(keys(&mapped), vec![Some("x//y/.$a".to_string())]);
    }

    #[test]
    fn test_map_flattens_list_results() {
        let children = Value::list([Value::from(el(Some("a"))), Value::from(el(Some("b")))]);
        let mapped = map(&children, |x, _| Value::list([x.clone(), x.clone()])).unwrap().unwrap();
        assert_eq!(
            keys(&mapped),
            vec![
                Some(".$a/.$a".to_string()),
                Some(".$a/.$a=11".to_string()),
                Some(".$b/.$b".to_string()),
                Some(".$b/.$b=11".to_string()),
            ]
        );
    }

    #[test]
    fn test_for_each_skips_empty() {
        let children = Value::list([Value::from(1), Value::from(true), Value::list([2, 3])]);
        let mut seen = Vec::new();
        for_each(&children, |x, i| seen.push((x.as_number(), i))).unwrap();
        assert_eq!(seen, vec![(Some(1.0), 0), (Some(2.0), 2), (Some(3.0), 3)]);
    }

    #[test]
    fn test_count_wrapping_is_invariant() {
        let inner = Value::list([Value::from("a"), Value::list([1, 2]), Value::Null]);
        let wrapped = Value::list([inner.clone()]);
        assert_eq!(count(&inner).unwrap(), 4);
        assert_eq!(count(&wrapped).unwrap(), 4);
        assert_eq!(count(&Value::Null).unwrap(), 0);
    }

    #[test]
    fn test_to_array_flattens() {
        let children = Value::list([Value::list([1, 2]), Value::list([3])]);
        let flat = to_array(&children).unwrap();
        assert_eq!(flat, vec![Value::from(1), Value::from(2), Value::from(3)]);

        let labelled = keyed(&children).unwrap();
        let paths: Vec<&str> = labelled.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(paths, vec![".0:0", ".0:1", ".1:0"]);
    }

    #[test]
    fn test_to_array_twice_keeps_keys_unique() {
        let children = Value::list([
            Value::list([Value::from(el(Some("a"))), Value::from(el(None))]),
            Value::from(el(Some("a"))),
        ]);
        let once = to_array(&children).unwrap();
        let twice = to_array(&Value::from(once.clone())).unwrap();

        let mut seen = std::collections::HashSet::new();
        for key in keys(&twice).into_iter().flatten() {
            assert!(seen.insert(key));
        }
        assert_eq!(twice.len(), once.len());
    }

    #[test]
    fn test_keyed_into_value_rekeys_elements() {
        let children = Value::list([Value::from(el(None)), Value::from("t")]);
        let values: Vec<Value> = keyed(&children)
            .unwrap()
            .into_iter()
            .map(KeyedChild::into_value)
            .collect();
        assert_eq!(values[0].as_element().and_then(Element::key), Some(&Key::from(".0")));
        assert_eq!(values[1], Value::from("t"));
    }

    #[test]
    fn test_only() {
        let single = el(None);
        let value = Value::from(single.clone());
        assert!(only(&value).unwrap().ptr_eq(&single));

        let wrapped = Value::list([value.clone()]);
        assert_eq!(only(&wrapped).unwrap_err(), ChildrenError::MultipleChildren);
        assert_eq!(only(&Value::Null).unwrap_err(), ChildrenError::MultipleChildren);
        assert_eq!(only(&Value::from("text")).unwrap_err(), ChildrenError::MultipleChildren);
    }

    #[test]
    fn test_invalid_child_propagates_from_map() {
        let children = Value::list([Value::record([("a", 1)])]);
        let err = map(&children, |x, _| x.clone()).unwrap_err();
        assert!(matches!(err, ChildrenError::InvalidChild { .. }));
    }
}
