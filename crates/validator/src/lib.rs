//! # tagcheck-validator
//!
//! Declarative struct validation driven by rule expressions.
//!
//! Each field carries an expression such as `"required,min=5,email"`. The
//! validator compiles expressions into cached plans, walks the value
//! (scalars, sequences, mappings, nested structs), evaluates named rules
//! from a pluggable registry and collects every failure into one ordered
//! [`ValidationErrors`].
//!
//! ## Quick Start
//!
//! ```rust
//! use tagcheck_validator::{Inspect, Validator};
//!
//! #[derive(Inspect)]
//! #[validate(rename_all = "PascalCase")]
//! struct LoginRequest {
//!     #[validate(rules = "required,email")]
//!     username: String,
//!     #[validate(rules = "required,min=5")]
//!     password: String,
//! }
//!
//! let validator = Validator::new();
//! let request = LoginRequest {
//!     username: "roni".into(),
//!     password: "rahasia".into(),
//! };
//!
//! let errors = validator.validate_struct(&request).unwrap();
//! assert_eq!(errors.summary(), vec![("Username", "email")]);
//! ```
//!
//! ## Rule expressions
//!
//! - `,` separates groups; every group must pass.
//! - `|` separates alternatives inside a group; one must pass.
//! - `=` introduces a parameter; `0x2C` and `0x7C` escape `,` and `|`.
//! - Directives: `omitempty`, `dive`, `keys` ... `endkeys`, and `-`.
//!
//! ## Built-in rules
//!
//! - **Presence**: `required`
//! - **Comparison**: `len`, `min`, `max`, `eq`, `ne`, `gt`, `gte`, `lt`,
//!   `lte`, `oneof`
//! - **Format**: `numeric`, `number`, `alpha`, `alphanum`, `email`, `url`,
//!   `lowercase`, `uppercase`
//! - **Cross-field**: `eqfield`, `nefield`, `gtfield`, `gtefield`,
//!   `ltfield`, `ltefield`, `eqcsfield`, `necsfield`

extern crate self as tagcheck_validator;

mod engine;
pub mod foundation;
pub mod level;
pub mod prelude;
pub mod registry;
pub mod rules;
pub mod tag;
mod validator;

pub use foundation::{
    Error, FieldValue, Inspect, Kind, RuleFault, StructValue, StructuralError, ValidationError,
    ValidationErrors, ValidatorConfig, Value,
};
pub use level::{FieldLevel, StructLevel};
pub use registry::{ParamSpec, RuleFn, RuleRegistry};
pub use tag::parse_tag;
pub use validator::{StructHook, Validator};

#[cfg(feature = "derive")]
pub use tagcheck_validator_macros::Inspect;
