//! Validating element factory

use crate::keys::validate_child_keys;
use crate::{Diagnostics, WarningKind};
use arbor_element::{
    Element, ElementConfig, ElementType, Factory, Props, ReservedPropObserver, Value,
    clone_element_observed, create_element_observed, create_factory,
};
use std::sync::Arc;

/// Factory wrapper that reports mistakes through [`Diagnostics`]
#[derive(Debug, Clone)]
pub struct Validator {
    diagnostics: Arc<Diagnostics>,
    warn_missing_keys: bool,
}

impl Validator {
    pub fn new(diagnostics: Arc<Diagnostics>) -> Self {
        tracing::debug!("Element validation enabled");
        Self {
            diagnostics,
            warn_missing_keys: true,
        }
    }

    /// Toggle the "each child in a list should have a key" warning
    pub fn with_missing_key_warnings(mut self, enabled: bool) -> Self {
        self.warn_missing_keys = enabled;
        self
    }

    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    pub fn create_element(
        &self,
        ty: impl Into<ElementType>,
        config: ElementConfig,
        children: Vec<Value>,
    ) -> Element {
        let ty = ty.into();
        match ty.validate() {
            Ok(()) => self.check_children(ty.display_name(), &config, &children),
            Err(e) => {
                let site = format!("{ty:?}");
                self.diagnostics
                    .warn_once(WarningKind::InvalidType, &site, || e.to_string());
            }
        }
        create_element_observed(ty, config, children, self.observer())
    }

    pub fn clone_element(
        &self,
        element: &Element,
        config: ElementConfig,
        children: Vec<Value>,
    ) -> Element {
        self.check_children(element.ty().display_name(), &config, &children);
        clone_element_observed(element, config, children, self.observer())
    }

    pub fn create_factory(&self, ty: impl Into<ElementType>) -> ValidatedFactory {
        ValidatedFactory {
            inner: create_factory(ty),
            validator: self.clone(),
        }
    }

    /// Shallow merge of several prop maps
    #[deprecated(note = "use `Props::merged`")]
    pub fn spread(&self, parts: &[&Props]) -> Props {
        self.diagnostics.warn_once(WarningKind::Deprecated, "spread", || {
            "spread is deprecated and should not be used. Use Props::merged instead.".to_string()
        });
        parts
            .iter()
            .fold(Props::new(), |acc, part| acc.merged(part))
    }

    /// Positional children win; without them the config's `children` entry is used
    fn check_children(&self, parent: &str, config: &ElementConfig, children: &[Value]) {
        let from_config = children
            .is_empty()
            .then(|| config.get_children())
            .flatten();
        for child in children.iter().chain(from_config) {
            validate_child_keys(&self.diagnostics, parent, child, self.warn_missing_keys);
        }
    }

    fn observer(&self) -> Arc<dyn ReservedPropObserver> {
        self.diagnostics.clone()
    }
}

/// [`Factory`] created through a [`Validator`]
#[derive(Debug, Clone)]
pub struct ValidatedFactory {
    inner: Factory,
    validator: Validator,
}

impl ValidatedFactory {
    pub fn create(&self, config: ElementConfig, children: Vec<Value>) -> Element {
        self.validator
            .create_element(self.inner.ty().clone(), config, children)
    }

    /// The bound type
    ///
    /// Deprecated access path: keep a handle on the type before creating
    /// the factory instead.
    pub fn ty(&self) -> &ElementType {
        self.validator
            .diagnostics
            .warn_once(WarningKind::Deprecated, "Factory.ty", || {
                "Factory::ty is deprecated. Access the type directly before passing it to \
                 create_factory."
                    .to_string()
            });
        self.inner.ty()
    }
}
