//! Arbor Configuration

/// Arbor configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Route element creation through the validator.
    /// Ignored when the `validation` feature is off.
    pub validation: bool,

    /// Warn about elements without a key inside child lists
    pub warn_missing_keys: bool,
}

impl Config {
    /// All checks on
    pub fn development() -> Self {
        Self {
            validation: true,
            warn_missing_keys: true,
        }
    }

    /// No checks
    pub fn production() -> Self {
        Self {
            validation: false,
            warn_missing_keys: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            validation: cfg!(debug_assertions),
            warn_missing_keys: true,
        }
    }
}
