//! Sibling key checks

use crate::{Diagnostics, WarningKind};
use arbor_element::{Key, Value};
use std::borrow::Borrow;
use std::collections::HashSet;

/// Scan one children argument of `parent`
///
/// A bare element needs no key. Lists and restartable lazy sequences are
/// checked level by level; one-shot sequences are left alone so the
/// check never consumes them.
pub(crate) fn validate_child_keys(
    diagnostics: &Diagnostics,
    parent: &str,
    child: &Value,
    warn_missing: bool,
) {
    match child {
        Value::List(items) => validate_siblings(diagnostics, parent, items.iter(), warn_missing),
        Value::Lazy(seq) if seq.is_restartable() => {
            validate_siblings(diagnostics, parent, seq.drain(), warn_missing)
        }
        _ => {}
    }
}

fn validate_siblings<I>(diagnostics: &Diagnostics, parent: &str, siblings: I, warn_missing: bool)
where
    I: IntoIterator,
    I::Item: Borrow<Value>,
{
    let mut seen: HashSet<Key> = HashSet::new();
    for sibling in siblings {
        let sibling: &Value = sibling.borrow();
        match sibling {
            Value::Element(el) => match el.key() {
                Some(key) => {
                    if !seen.insert(key.clone()) {
                        warn_duplicate(diagnostics, parent, key);
                    }
                }
                None if warn_missing => {
                    diagnostics.warn_once(WarningKind::MissingKey, parent, || {
                        format!(
                            "Each child in a list should have a unique \"key\" prop. \
                             Check the children of <{parent}>."
                        )
                    });
                }
                None => {}
            },
            Value::List(_) | Value::Lazy(_) => {
                validate_child_keys(diagnostics, parent, sibling, warn_missing)
            }
            _ => {}
        }
    }
}

fn warn_duplicate(diagnostics: &Diagnostics, parent: &str, key: &Key) {
    let site = format!("{parent}/{key}");
    diagnostics.warn_once(WarningKind::DuplicateKey, &site, || {
        format!(
            "Encountered two children with the same key, `{key}`, inside <{parent}>. \
             Keys should be unique so that identity is preserved across updates."
        )
    });
}
