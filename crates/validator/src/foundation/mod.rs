//! Core types shared by every layer of the engine
//!
//! - **Values**: [`Value`], [`StructValue`], [`FieldValue`], [`Kind`]
//! - **Inspection**: the [`Inspect`] trait and its std/serde_json impls
//! - **Errors**: [`ValidationError`], [`ValidationErrors`], [`StructuralError`],
//!   [`RuleFault`], [`Error`]
//! - **Configuration**: [`ValidatorConfig`]

pub mod config;
pub mod error;
pub mod inspect;
pub mod value;

pub use config::ValidatorConfig;
pub use error::{Error, RuleFault, StructuralError, ValidationError, ValidationErrors};
pub use inspect::Inspect;
pub use value::{FieldValue, Kind, StructValue, Value};
