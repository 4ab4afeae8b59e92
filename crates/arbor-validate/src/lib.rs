//! Arbor Validate - Development-mode checks
//!
//! Wraps the element factory to report likely mistakes: invalid types,
//! missing or duplicate keys in child lists, reading `key`/`ref` through
//! props, and deprecated helpers. Every check is advisory; results are
//! identical to the unvalidated factory.

mod diagnostics;
mod keys;
mod validator;

pub use diagnostics::{
    Diagnostics, DiagnosticsSink, RecordingSink, TracingSink, Warning, WarningKind,
};
pub use validator::{ValidatedFactory, Validator};
