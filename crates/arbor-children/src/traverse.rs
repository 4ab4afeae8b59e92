//! Key-path traversal engine

use crate::ChildrenError;
use arbor_element::{Element, Key, LazySeq, Value};
use std::borrow::Borrow;
use std::collections::HashMap;

/// Opens a key-path at the root
pub const SEPARATOR: char = '.';
/// Separates nesting levels
pub const SUBSEPARATOR: char = ':';

const KEYED_MARKER: char = '$';
const DUPLICATE_MARKER: &str = "=1";
const RADIX_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Null and booleans are handed to visitors as this
static EMPTY: Value = Value::Null;

/// Children value classified once per nesting level
enum Shape<'a> {
    Leaf(&'a Value),
    Sequence(&'a [Value]),
    Lazy(&'a LazySeq),
}

impl<'a> Shape<'a> {
    fn of(value: &'a Value) -> Result<Self, ChildrenError> {
        match value {
            Value::Null | Value::Bool(_) => Ok(Shape::Leaf(&EMPTY)),
            Value::Number(_) | Value::Str(_) | Value::Element(_) => Ok(Shape::Leaf(value)),
            Value::List(items) => Ok(Shape::Sequence(items)),
            Value::Lazy(seq) => Ok(Shape::Lazy(seq)),
            Value::Record(map) => {
                let keys: Vec<&str> = map.keys().map(|k| &**k).collect();
                Err(ChildrenError::InvalidChild {
                    found: format!("object with keys {{{}}}", keys.join(", ")),
                })
            }
            Value::Callback(_) => Err(ChildrenError::InvalidChild {
                found: "function".to_string(),
            }),
        }
    }
}

/// Walk `children` and call `visitor(leaf, key_path)` for every leaf
///
/// Returns the number of leaves, empty ones included. A null root counts
/// as zero. Under a non-empty `prefix` the root level is joined with `:`
/// instead of opening with `.`; pass `""` for a fresh walk.
pub fn traverse<F>(children: &Value, prefix: &str, mut visitor: F) -> Result<usize, ChildrenError>
where
    F: FnMut(&Value, &str),
{
    try_traverse(children, prefix, |child, key| {
        visitor(child, key);
        Ok(())
    })
}

/// [`traverse`] with a visitor that can abort the walk
pub fn try_traverse<F>(
    children: &Value,
    prefix: &str,
    mut visitor: F,
) -> Result<usize, ChildrenError>
where
    F: FnMut(&Value, &str) -> Result<(), ChildrenError>,
{
    if children.is_null() {
        return Ok(0);
    }
    let mut walker = Walker {
        path: String::from(prefix),
        visitor: &mut visitor,
    };
    walker.walk_root(children)
}

struct Walker<'f, F> {
    /// Key-path of the value being walked; truncated back after each member
    path: String,
    visitor: &'f mut F,
}

impl<F> Walker<'_, F>
where
    F: FnMut(&Value, &str) -> Result<(), ChildrenError>,
{
    /// A lone root child is labelled as member 0 of a one-member level
    fn walk_root(&mut self, root: &Value) -> Result<usize, ChildrenError> {
        match root {
            Value::List(_) | Value::Lazy(_) => self.walk(root),
            _ => self.walk_members(std::iter::once(root)),
        }
    }

    fn walk(&mut self, child: &Value) -> Result<usize, ChildrenError> {
        match Shape::of(child)? {
            Shape::Leaf(leaf) => {
                (self.visitor)(leaf, &self.path)?;
                Ok(1)
            }
            Shape::Sequence(items) => self.walk_members(items.iter()),
            Shape::Lazy(seq) => self.walk_members(seq.drain()),
        }
    }

    fn walk_members<I>(&mut self, members: I) -> Result<usize, ChildrenError>
    where
        I: IntoIterator,
        I::Item: Borrow<Value>,
    {
        let base = self.path.len();
        let separator = if base == 0 { SEPARATOR } else { SUBSEPARATOR };
        let mut siblings = Siblings::default();
        let mut count = 0;

        for member in members {
            let member: &Value = member.borrow();
            self.path.push(separator);
            siblings.push_component(&mut self.path, member);
            let walked = self.walk(member);
            self.path.truncate(base);
            count += walked?;
        }
        Ok(count)
    }
}

/// Component bookkeeping for one nesting level
#[derive(Default)]
struct Siblings {
    index: usize,
    seen: HashMap<Key, usize>,
}

impl Siblings {
    fn push_component(&mut self, path: &mut String, member: &Value) {
        match member.as_element().and_then(Element::key) {
            Some(key) => {
                push_escaped(path, key.as_str());
                let repeats = self.seen.entry(key.clone()).or_insert(0);
                if *repeats > 0 {
                    tracing::debug!("Duplicate sibling key {:?}, disambiguating", key.as_str());
                    path.push_str(DUPLICATE_MARKER);
                    push_radix36(path, *repeats);
                }
                *repeats += 1;
            }
            None => push_radix36(path, self.index),
        }
        self.index += 1;
    }
}

/// Escape a user key into a key-path component
pub fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 1);
    push_escaped(&mut out, key);
    out
}

/// Inverse of [`escape_key`]
///
/// Accepts a component with or without its leading `.`/`$` markers.
/// Returns `None` for text [`escape_key`] cannot produce.
pub fn unescape_key(component: &str) -> Option<String> {
    let body = component.strip_prefix(SEPARATOR).unwrap_or(component);
    let body = body.strip_prefix(KEYED_MARKER).unwrap_or(body);

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '=' => match chars.next() {
                Some('0') => out.push('='),
                Some('2') => out.push(':'),
                _ => return None,
            },
            ':' => return None,
            _ => out.push(c),
        }
    }
    Some(out)
}

fn push_escaped(path: &mut String, key: &str) {
    path.push(KEYED_MARKER);
    for c in key.chars() {
        match c {
            '=' => path.push_str("=0"),
            ':' => path.push_str("=2"),
            _ => path.push(c),
        }
    }
}

fn push_radix36(path: &mut String, mut n: usize) {
    let mut buf = [0u8; 16];
    let mut pos = buf.len();
    loop {
        pos -= 1;
        buf[pos] = RADIX_DIGITS[n % 36];
        n /= 36;
        if n == 0 {
            break;
        }
    }
    for &digit in &buf[pos..] {
        path.push(digit as char);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_element::{ElementConfig, create_element};

    fn keyed_el(key: &str) -> Value {
        create_element("li", ElementConfig::new().key(key), vec![]).into()
    }

    fn prefixed(children: &Value, prefix: &str) -> Vec<String> {
        let mut out = Vec::new();
        traverse(children, prefix, |_, key| out.push(key.to_string())).unwrap();
        out
    }

    fn paths(children: &Value) -> Vec<String> {
        prefixed(children, "")
    }

    #[test]
    fn test_radix36() {
        let mut s = String::new();
        for n in [0, 9, 10, 35, 36, 1295] {
            push_radix36(&mut s, n);
            s.push(' ');
        }
        assert_eq!(s, "0 9 a z 10 zz ");
    }

    #[test]
    fn test_single_root_child() {
        assert_eq!(paths(&Value::from("a")), vec![".0"]);
        assert_eq!(paths(&keyed_el("k")), vec![".$k"]);
    }

    #[test]
    fn test_flat_and_nested_lists() {
        let flat = Value::list(["a", "b"]);
        assert_eq!(paths(&flat), vec![".0", ".1"]);

        let nested = Value::list([Value::list([1, 2]), Value::list([3])]);
        assert_eq!(paths(&nested), vec![".0:0", ".0:1", ".1:0"]);
    }

    #[test]
    fn test_keyed_members_mix_with_positions() {
        let children = Value::list([keyed_el("a"), Value::from("x"), keyed_el("b")]);
        assert_eq!(paths(&children), vec![".$a", ".1", ".$b"]);
    }

    #[test]
    fn test_duplicate_keys_are_disambiguated() {
        let children = Value::list([keyed_el("a"), keyed_el("a"), keyed_el("a")]);
        assert_eq!(paths(&children), vec![".$a", ".$a=11", ".$a=12"]);
    }

    #[test]
    fn test_escaping_in_paths() {
        assert_eq!(paths(&keyed_el("a:b=c")), vec![".$a=2b=0c"]);
        // a key that looks like an index never collides with a position
        let children = Value::list([Value::from("x"), keyed_el("0")]);
        assert_eq!(paths(&children), vec![".0", ".$0"]);
    }

    #[test]
    fn test_empty_leaves_keep_their_slot() {
        let children = Value::list([
            Value::from("a"),
            Value::Null,
            Value::from(false),
            Value::from("b"),
        ]);
        let mut seen = Vec::new();
        let count = traverse(&children, "", |child, key| {
            seen.push((child.clone(), key.to_string()))
        })
        .unwrap();

        assert_eq!(count, 4);
        assert_eq!(seen[1], (Value::Null, ".1".to_string()));
        assert_eq!(seen[2], (Value::Null, ".2".to_string()));
        assert_eq!(seen[3].1, ".3");
    }

    #[test]
    fn test_root_null_and_bool() {
        assert_eq!(traverse(&Value::Null, "", |_, _| {}).unwrap(), 0);
        assert_eq!(paths(&Value::from(true)), vec![".0"]);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(prefixed(&Value::from("x"), ".5"), vec![".5:0"]);
        assert_eq!(prefixed(&Value::list(["x"]), ".5"), vec![".5:0"]);
        assert_eq!(prefixed(&keyed_el("a"), ".5"), vec![".5:$a"]);
        assert_ne!(prefixed(&keyed_el("a"), ".5"), prefixed(&keyed_el("b"), ".5"));
    }

    #[test]
    fn test_lazy_sequences() {
        let once = Value::from(LazySeq::once(vec![Value::from("a"), Value::from("b")]));
        assert_eq!(paths(&once), vec![".0", ".1"]);
        assert!(paths(&once).is_empty());

        let restartable = Value::from(LazySeq::new(|| vec![Value::from(1), Value::list([2, 3])]));
        assert_eq!(paths(&restartable), vec![".0", ".1:0", ".1:1"]);
        assert_eq!(paths(&restartable), paths(&restartable));
    }

    #[test]
    fn test_record_is_invalid_child() {
        let children = Value::list([Value::from("a"), Value::record([("b", 1), ("a", 2)])]);
        let err = traverse(&children, "", |_, _| {}).unwrap_err();
        assert_eq!(
            err,
            ChildrenError::InvalidChild {
                found: "object with keys {a, b}".to_string()
            }
        );
    }

    #[test]
    fn test_callback_is_invalid_child() {
        let cb = arbor_element::Callback::new(|_| Value::Null);
        let err = traverse(&Value::from(cb), "", |_, _| {}).unwrap_err();
        assert!(matches!(err, ChildrenError::InvalidChild { .. }));
    }

    #[test]
    fn test_visitor_error_aborts() {
        let children = Value::list(["a", "b", "c"]);
        let mut visited = 0;
        let result = try_traverse(&children, "", |_, _| {
            visited += 1;
            if visited == 2 {
                Err(ChildrenError::MultipleChildren)
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err(ChildrenError::MultipleChildren));
        assert_eq!(visited, 2);
    }

    #[test]
    fn test_escape_roundtrip_and_rejects() {
        let key = "a=b:c==";
        let escaped = escape_key(key);
        assert_eq!(escaped, "$a=0b=2c=0=0");
        assert_eq!(unescape_key(&escaped).as_deref(), Some(key));
        assert_eq!(unescape_key(".$x=2y").as_deref(), Some("x:y"));
        assert_eq!(unescape_key("$a=11"), None);
        assert_eq!(unescape_key("$a:b"), None);
    }
}
