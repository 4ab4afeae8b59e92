//! Element factory
//!
//! `create_element` and `clone_element` never fail: a missing type is
//! reported by the validation layer, not here. Strict callers can use
//! [`try_create_element`].

use crate::element::ElementData;
use crate::props::CHILDREN;
use crate::{
    Element, ElementConfig, ElementError, ElementType, Props, ReservedPropObserver, Value,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Create an element
///
/// One child is stored as-is under `children`; two or more become a list.
/// With no children, a `children` entry in `config` is kept.
pub fn create_element(
    ty: impl Into<ElementType>,
    config: ElementConfig,
    children: Vec<Value>,
) -> Element {
    build(ty.into(), config, children, None)
}

/// Like [`create_element`], but rejects an invalid type
pub fn try_create_element(
    ty: impl Into<ElementType>,
    config: ElementConfig,
    children: Vec<Value>,
) -> Result<Element, ElementError> {
    let ty = ty.into();
    if let Err(e) = ty.validate() {
        tracing::debug!("Rejected element: {}", e);
        return Err(e);
    }
    Ok(build(ty, config, children, None))
}

/// Create an element whose props report reads of `key`/`ref`
pub fn create_element_observed(
    ty: impl Into<ElementType>,
    config: ElementConfig,
    children: Vec<Value>,
    observer: Arc<dyn ReservedPropObserver>,
) -> Element {
    build(ty.into(), config, children, Some(observer))
}

/// Copy `element` with overrides
///
/// `key`/`ref` change only when present in `config`. Children arguments
/// replace the original children entirely.
pub fn clone_element(element: &Element, config: ElementConfig, children: Vec<Value>) -> Element {
    rebuild(element, config, children, None)
}

/// Like [`clone_element`], with a reserved-prop observer on the result
pub fn clone_element_observed(
    element: &Element,
    config: ElementConfig,
    children: Vec<Value>,
    observer: Arc<dyn ReservedPropObserver>,
) -> Element {
    rebuild(element, config, children, Some(observer))
}

/// Whether `value` is an element descriptor
#[inline]
pub fn is_valid_element(value: &Value) -> bool {
    matches!(value, Value::Element(_))
}

/// Create elements of one fixed type
pub fn create_factory(ty: impl Into<ElementType>) -> Factory {
    Factory { ty: ty.into() }
}

/// Element constructor bound to a type
#[derive(Debug, Clone)]
pub struct Factory {
    ty: ElementType,
}

impl Factory {
    pub fn create(&self, config: ElementConfig, children: Vec<Value>) -> Element {
        build(self.ty.clone(), config, children, None)
    }

    pub fn ty(&self) -> &ElementType {
        &self.ty
    }
}

fn build(
    ty: ElementType,
    config: ElementConfig,
    children: Vec<Value>,
    observer: Option<Arc<dyn ReservedPropObserver>>,
) -> Element {
    let (key, ref_handle, mut props) = config.into_parts();
    set_children(&mut props, children);

    if let Some(defaults) = ty.default_props() {
        for (name, value) in defaults.entries() {
            props
                .entry(Arc::clone(name))
                .or_insert_with(|| value.clone());
        }
    }

    let mut props = Props::from_map(props);
    if let Some(observer) = observer {
        props = props.guarded(ty.display_name(), key.as_ref(), ref_handle.as_ref(), observer);
    }

    Element::from_data(ElementData {
        ty,
        key,
        ref_handle,
        props,
    })
}

fn rebuild(
    element: &Element,
    config: ElementConfig,
    children: Vec<Value>,
    observer: Option<Arc<dyn ReservedPropObserver>>,
) -> Element {
    let (key, ref_handle, overrides) = config.into_parts();

    let mut props = element.props().entries().clone();
    props.extend(overrides);
    set_children(&mut props, children);

    let ty = element.ty().clone();
    let key = key.or_else(|| element.key().cloned());
    let ref_handle = ref_handle.or_else(|| element.ref_handle().cloned());

    let mut props = Props::from_map(props);
    if let Some(observer) = observer {
        props = props.guarded(ty.display_name(), key.as_ref(), ref_handle.as_ref(), observer);
    }

    Element::from_data(ElementData {
        ty,
        key,
        ref_handle,
        props,
    })
}

fn set_children(props: &mut BTreeMap<Arc<str>, Value>, mut children: Vec<Value>) {
    let value = match children.len() {
        0 => return,
        1 => match children.pop() {
            Some(only) => only,
            None => return,
        },
        _ => Value::List(Arc::from(children)),
    };
    props.insert(Arc::from(CHILDREN), value);
}
