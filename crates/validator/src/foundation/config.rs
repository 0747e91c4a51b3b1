//! Validator configuration

use serde::{Deserialize, Serialize};

/// Behavioral switches for a [`Validator`](crate::Validator).
///
/// Deserializes from a partial document; missing keys take their default.
///
/// ```rust
/// use tagcheck_validator::ValidatorConfig;
///
/// let config: ValidatorConfig = serde_json::from_str(r#"{ "fail_fast": true }"#).unwrap();
/// assert!(config.fail_fast);
/// assert!(!config.allow_override);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Stop at the first recorded validation error.
    pub fail_fast: bool,

    /// Apply a struct field's own rules (e.g. `required`) before recursing
    /// into it. Off by default: nested structs are only recursed.
    pub required_struct_enabled: bool,

    /// Let `register*` replace an existing rule or alias instead of failing
    /// with `DuplicateRule`.
    pub allow_override: bool,
}

impl ValidatorConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_required_struct_enabled(mut self, enabled: bool) -> Self {
        self.required_struct_enabled = enabled;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_allow_override(mut self, enabled: bool) -> Self {
        self.allow_override = enabled;
        self
    }
}
