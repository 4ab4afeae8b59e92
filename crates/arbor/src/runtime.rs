//! Arbor - Main entry point

use crate::Config;
use arbor_children::ChildrenError;
use arbor_element::{Element, ElementConfig, ElementError, ElementType, Factory, Value};
#[cfg(feature = "validation")]
use arbor_validate::{Diagnostics, DiagnosticsSink, ValidatedFactory, Validator};
#[cfg(feature = "validation")]
use std::sync::Arc;

/// Element factory front end
///
/// Hands out plain descriptors, or validated ones when the configuration
/// asks for it. Either way the produced elements are identical.
#[derive(Debug, Clone)]
pub struct Arbor {
    config: Config,
    #[cfg(feature = "validation")]
    validator: Option<Validator>,
}

impl Arbor {
    /// Create an instance; warnings go to `tracing`
    #[cfg(feature = "validation")]
    pub fn new(config: Config) -> Self {
        Self::with_diagnostics(config, Arc::new(Diagnostics::tracing()))
    }

    #[cfg(not(feature = "validation"))]
    pub fn new(config: Config) -> Self {
        tracing::info!("Arbor {} initialized (validation: compiled out)", crate::VERSION);
        Self { config }
    }

    /// Create an instance reporting warnings to `sink`
    #[cfg(feature = "validation")]
    pub fn with_sink(config: Config, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self::with_diagnostics(config, Arc::new(Diagnostics::new(sink)))
    }

    /// Create an instance sharing existing diagnostics
    #[cfg(feature = "validation")]
    pub fn with_diagnostics(config: Config, diagnostics: Arc<Diagnostics>) -> Self {
        tracing::info!(
            "Arbor {} initialized (validation: {})",
            crate::VERSION,
            config.validation
        );
        let validator = config.validation.then(|| {
            Validator::new(diagnostics).with_missing_key_warnings(config.warn_missing_keys)
        });
        Self { config, validator }
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Diagnostics in use, if validation is on
    #[cfg(feature = "validation")]
    pub fn diagnostics(&self) -> Option<&Arc<Diagnostics>> {
        self.validator.as_ref().map(Validator::diagnostics)
    }

    pub fn create_element(
        &self,
        ty: impl Into<ElementType>,
        config: ElementConfig,
        children: Vec<Value>,
    ) -> Element {
        #[cfg(feature = "validation")]
        if let Some(validator) = &self.validator {
            return validator.create_element(ty, config, children);
        }
        arbor_element::create_element(ty, config, children)
    }

    /// Like [`Arbor::create_element`], but an invalid type is an error
    pub fn try_create_element(
        &self,
        ty: impl Into<ElementType>,
        config: ElementConfig,
        children: Vec<Value>,
    ) -> Result<Element> {
        let ty = ty.into();
        ty.validate()?;
        Ok(self.create_element(ty, config, children))
    }

    pub fn clone_element(
        &self,
        element: &Element,
        config: ElementConfig,
        children: Vec<Value>,
    ) -> Element {
        #[cfg(feature = "validation")]
        if let Some(validator) = &self.validator {
            return validator.clone_element(element, config, children);
        }
        arbor_element::clone_element(element, config, children)
    }

    pub fn create_factory(&self, ty: impl Into<ElementType>) -> ElementFactory {
        #[cfg(feature = "validation")]
        if let Some(validator) = &self.validator {
            return ElementFactory::Validated(validator.create_factory(ty));
        }
        ElementFactory::Plain(arbor_element::create_factory(ty))
    }

    #[inline]
    pub fn is_valid_element(&self, value: &Value) -> bool {
        arbor_element::is_valid_element(value)
    }
}

impl Default for Arbor {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Factory produced by [`Arbor::create_factory`]
#[derive(Debug, Clone)]
pub enum ElementFactory {
    Plain(Factory),
    #[cfg(feature = "validation")]
    Validated(ValidatedFactory),
}

impl ElementFactory {
    pub fn create(&self, config: ElementConfig, children: Vec<Value>) -> Element {
        match self {
            ElementFactory::Plain(f) => f.create(config, children),
            #[cfg(feature = "validation")]
            ElementFactory::Validated(f) => f.create(config, children),
        }
    }

    pub fn ty(&self) -> &ElementType {
        match self {
            ElementFactory::Plain(f) => f.ty(),
            #[cfg(feature = "validation")]
            ElementFactory::Validated(f) => f.ty(),
        }
    }
}

/// Arbor error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Element error: {0}")]
    Element(#[from] ElementError),

    #[error("Children error: {0}")]
    Children(#[from] ChildrenError),
}

pub type Result<T> = std::result::Result<T, Error>;
