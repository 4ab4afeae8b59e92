//! Diagnostics sink and one-time warning bookkeeping

use arbor_element::{ReservedProp, ReservedPropObserver};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Category of an advisory warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    InvalidType,
    MissingKey,
    DuplicateKey,
    ReservedPropAccess,
    Deprecated,
}

/// Advisory warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receives warnings
pub trait DiagnosticsSink: Send + Sync {
    fn emit(&self, warning: &Warning);
}

/// Forwards warnings to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn emit(&self, warning: &Warning) {
        tracing::warn!(target: "arbor::validation", kind = ?warning.kind, "{}", warning.message);
    }
}

/// Keeps warnings in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    warnings: Mutex<Vec<Warning>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Everything emitted so far
    pub fn warnings(&self) -> Vec<Warning> {
        self.lock().clone()
    }

    /// Drain recorded warnings
    pub fn take(&self) -> Vec<Warning> {
        std::mem::take(&mut *self.lock())
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.lock().iter().filter(|w| w.kind == kind).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Warning>> {
        self.warnings.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DiagnosticsSink for RecordingSink {
    fn emit(&self, warning: &Warning) {
        self.lock().push(warning.clone());
    }
}

/// Sink plus the "already warned" set
///
/// Each `(kind, site)` pair is reported at most once per instance. Share
/// one instance for process-wide deduplication; give each test its own.
pub struct Diagnostics {
    sink: Arc<dyn DiagnosticsSink>,
    fired: Mutex<HashSet<(WarningKind, String)>>,
}

impl Diagnostics {
    pub fn new(sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            sink,
            fired: Mutex::new(HashSet::new()),
        }
    }

    /// Diagnostics reporting through `tracing`
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    /// Emit a warning unless this `(kind, site)` already fired
    ///
    /// Returns whether the warning was emitted.
    pub fn warn_once<M>(&self, kind: WarningKind, site: &str, message: M) -> bool
    where
        M: FnOnce() -> String,
    {
        let first = self
            .fired
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((kind, site.to_string()));
        if first {
            self.sink.emit(&Warning {
                kind,
                message: message(),
            });
        }
        first
    }

    pub fn has_fired(&self, kind: WarningKind, site: &str) -> bool {
        self.fired
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&(kind, site.to_string()))
    }

    /// Forget which warnings fired
    pub fn reset(&self) {
        self.fired.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fired = self.fired.lock().unwrap_or_else(|e| e.into_inner()).len();
        f.debug_struct("Diagnostics").field("fired", &fired).finish()
    }
}

impl ReservedPropObserver for Diagnostics {
    fn reserved_prop_read(&self, element: &str, prop: ReservedProp) {
        let name = prop.as_str();
        self.warn_once(
            WarningKind::ReservedPropAccess,
            &format!("{element}.{name}"),
            || {
                format!(
                    "<{element}>: `{name}` is not a prop. \
                     Reading it through props returns nothing. \
                     Pass the value as a differently named prop if the component needs it."
                )
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_per_site() {
        let sink = RecordingSink::new();
        let diagnostics = Diagnostics::new(sink.clone());

        assert!(diagnostics.warn_once(WarningKind::Deprecated, "spread", || "first".into()));
        assert!(!diagnostics.warn_once(WarningKind::Deprecated, "spread", || "second".into()));
        assert!(diagnostics.warn_once(WarningKind::Deprecated, "factory", || "third".into()));

        let messages: Vec<String> = sink.warnings().into_iter().map(|w| w.message).collect();
        assert_eq!(messages, vec!["first", "third"]);
    }

    #[test]
    fn test_reset_allows_refiring() {
        let sink = RecordingSink::new();
        let diagnostics = Diagnostics::new(sink.clone());

        diagnostics.warn_once(WarningKind::MissingKey, "ul", || "m".into());
        assert!(diagnostics.has_fired(WarningKind::MissingKey, "ul"));
        diagnostics.reset();
        assert!(!diagnostics.has_fired(WarningKind::MissingKey, "ul"));
        diagnostics.warn_once(WarningKind::MissingKey, "ul", || "m".into());

        assert_eq!(sink.count(WarningKind::MissingKey), 2);
    }

    #[test]
    fn test_message_not_built_when_suppressed() {
        let diagnostics = Diagnostics::new(RecordingSink::new());
        diagnostics.warn_once(WarningKind::InvalidType, "x", || "built".into());
        diagnostics.warn_once(WarningKind::InvalidType, "x", || panic!("message built twice"));
    }

    #[test]
    fn test_reserved_read_message() {
        let sink = RecordingSink::new();
        let diagnostics = Diagnostics::new(sink.clone());
        diagnostics.reserved_prop_read("li", ReservedProp::Key);
        diagnostics.reserved_prop_read("li", ReservedProp::Key);

        let warnings = sink.take();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::ReservedPropAccess);
        assert!(warnings[0].message.contains("`key` is not a prop"));
        assert!(sink.warnings().is_empty());
    }
}
