//! Built-in rules
//!
//! Every rule is a plain function with the [`RuleFn`](crate::registry::RuleFn)
//! signature. They are registered by [`RuleRegistry::new`](crate::RuleRegistry::new).

pub mod compare;
pub mod cross_field;
pub mod format;
pub mod presence;

use std::borrow::Cow;

/// English message for a failed `rule`.
///
/// Unknown (custom) rules get a generic message naming the rule.
#[must_use]
pub fn default_message(rule: &str, param: Option<&str>) -> Cow<'static, str> {
    let p = param.unwrap_or_default();
    match rule {
        "required" => Cow::Borrowed("is required"),

        "len" => format!("must have length {p}").into(),
        "min" => format!("must be at least {p}").into(),
        "max" => format!("must be at most {p}").into(),
        "eq" => format!("must be equal to {p}").into(),
        "ne" => format!("must not be equal to {p}").into(),
        "gt" => format!("must be greater than {p}").into(),
        "gte" => format!("must be greater than or equal to {p}").into(),
        "lt" => format!("must be less than {p}").into(),
        "lte" => format!("must be less than or equal to {p}").into(),
        "oneof" => format!("must be one of [{p}]").into(),

        "numeric" => Cow::Borrowed("must be a numeric value"),
        "number" => Cow::Borrowed("must be a number"),
        "alpha" => Cow::Borrowed("must contain only letters"),
        "alphanum" => Cow::Borrowed("must contain only letters and digits"),
        "email" => Cow::Borrowed("must be a valid email address"),
        "url" => Cow::Borrowed("must be a valid URL"),
        "lowercase" => Cow::Borrowed("must be lowercase"),
        "uppercase" => Cow::Borrowed("must be uppercase"),

        "eqfield" | "eqcsfield" => format!("must be equal to {p}").into(),
        "nefield" | "necsfield" => format!("must not be equal to {p}").into(),
        "gtfield" => format!("must be greater than {p}").into(),
        "gtefield" => format!("must be greater than or equal to {p}").into(),
        "ltfield" => format!("must be less than {p}").into(),
        "ltefield" => format!("must be less than or equal to {p}").into(),

        _ => match param {
            Some(p) => format!("failed on the `{rule}={p}` rule").into(),
            None => format!("failed on the `{rule}` rule").into(),
        },
    }
}
