//! # tagcheck-validator-macros
//!
//! `#[derive(Inspect)]` for [`tagcheck-validator`](https://docs.rs/tagcheck-validator).
//!
//! Use it through the re-export: `use tagcheck_validator::Inspect;`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

extern crate proc_macro;

use proc_macro::TokenStream;

mod inspect;
mod support;

/// Derive macro for the `Inspect` trait.
///
/// Describes a struct with named fields to the validator: its name, and
/// per field the name used in error paths, the rule expression and the
/// inspected value. Every field type must implement `Inspect`. Fields
/// without rules are still recursed into when they hold structs.
///
/// # Attributes
///
/// ## Container attributes (`#[validate(...)]` on the struct)
///
/// - `name = "..."` - Struct name reported by `StructValue::name` (default: the Rust name)
/// - `rename_all = "..."` - Field naming: `snake_case` (default), `PascalCase`, `camelCase`
///
/// ## Field attributes
///
/// - `#[validate(rules = "...")]` - Rule expression for the field
/// - `#[validate(rename = "...")]` - Name used in error paths
/// - `#[validate(skip)]` - Leaves the field out entirely
///
/// # Example
///
/// ```ignore
/// #[derive(Inspect)]
/// #[validate(rename_all = "PascalCase")]
/// struct RegisterRequest {
///     #[validate(rules = "required,min=5")]
///     username: String,
///     #[validate(rules = "required,eqfield=Password")]
///     confirm_password: String,
///     #[validate(skip)]
///     session: Option<u64>,
/// }
/// ```
#[proc_macro_derive(Inspect, attributes(validate))]
pub fn derive_inspect(input: TokenStream) -> TokenStream {
    inspect::derive(input)
}
