//! Prelude module for convenient imports.
//!
//! Provides a single `use tagcheck_validator::prelude::*;` import that brings
//! in the validator, the inspection trait and the error types.
//!
//! # Examples
//!
//! ```rust
//! use tagcheck_validator::prelude::*;
//!
//! let validator = Validator::with_config(ValidatorConfig::new().with_fail_fast(true));
//! let errors = validator.validate_value("", "required,min=5").unwrap();
//! assert_eq!(errors.len(), 1);
//! ```

// ============================================================================
// FOUNDATION: Values, errors, configuration
// ============================================================================

pub use crate::foundation::{
    Error, Inspect, Kind, RuleFault, StructValue, StructuralError, ValidationError,
    ValidationErrors, ValidatorConfig, Value,
};

// ============================================================================
// ENGINE: Validator, registry, rule contexts
// ============================================================================

pub use crate::level::{FieldLevel, StructLevel};
pub use crate::registry::ParamSpec;
pub use crate::validator::Validator;

// ============================================================================
// DERIVE-GATED: #[derive(Inspect)]
// ============================================================================

#[cfg(feature = "derive")]
pub use tagcheck_validator_macros::Inspect;
