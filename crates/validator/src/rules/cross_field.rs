//! Cross-field and cross-struct rules
//!
//! `*field` rules resolve their parameter against the struct holding the
//! value; `*csfield` rules against the top-level value. A reference that
//! does not resolve fails the rule (`nefield`/`necsfield` pass).

use std::cmp::Ordering;

use crate::foundation::{RuleFault, Value};
use crate::level::FieldLevel;

/// Equality that tolerates signed/unsigned integer mixes.
fn same(a: &Value<'_>, b: &Value<'_>) -> bool {
    match (a, b) {
        (Value::Int(i), Value::Uint(u)) | (Value::Uint(u), Value::Int(i)) => {
            u64::try_from(*i).is_ok_and(|i| i == *u)
        }
        _ => a == b,
    }
}

fn compare_with(
    other: Option<&Value<'_>>,
    fl: &FieldLevel<'_>,
    accept: fn(Ordering) -> bool,
) -> bool {
    other
        .and_then(|other| fl.value().compare(other))
        .is_some_and(accept)
}

pub fn eqfield(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(fl.param_field().is_some_and(|other| same(fl.value(), other)))
}

pub fn nefield(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(!fl.param_field().is_some_and(|other| same(fl.value(), other)))
}

pub fn gtfield(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(compare_with(fl.param_field(), fl, Ordering::is_gt))
}

pub fn gtefield(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(compare_with(fl.param_field(), fl, Ordering::is_ge))
}

pub fn ltfield(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(compare_with(fl.param_field(), fl, Ordering::is_lt))
}

pub fn ltefield(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(compare_with(fl.param_field(), fl, Ordering::is_le))
}

pub fn eqcsfield(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(fl.cross_struct().is_some_and(|other| same(fl.value(), other)))
}

pub fn necsfield(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(!fl.cross_struct().is_some_and(|other| same(fl.value(), other)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::StructValue;

    struct Form;
    struct Root;

    fn form() -> Value<'static> {
        static FORM: Form = Form;
        Value::Struct(
            StructValue::new("Form", &FORM)
                .with_field("Password", "", Value::from("rahasia"))
                .with_field("Start", "", Value::Int(5))
                .with_field("Count", "", Value::Uint(5)),
        )
    }

    fn root(form: Value<'static>) -> Value<'static> {
        static ROOT: Root = Root;
        Value::Struct(
            StructValue::new("Root", &ROOT)
                .with_field("Owner", "", Value::from("roni"))
                .with_field("Form", "", form),
        )
    }

    fn check(
        rule: fn(&FieldLevel<'_>) -> Result<bool, RuleFault>,
        value: &Value<'_>,
        param: &str,
        parent: &Value<'_>,
        top: &Value<'_>,
    ) -> bool {
        let fl = FieldLevel {
            value,
            param: Some(param),
            rule: "test",
            path: "Form.Field",
            field: "Field",
            parent: Some(parent),
            top,
        };
        rule(&fl).unwrap()
    }

    #[test]
    fn test_eqfield() {
        let form = form();
        let top = root(form.clone());
        assert!(check(eqfield, &Value::from("rahasia"), "Password", &form, &top));
        assert!(!check(eqfield, &Value::from("salah"), "Password", &form, &top));
        assert!(!check(eqfield, &Value::from("x"), "Missing", &form, &top));
    }

    #[test]
    fn test_nefield_passes_on_missing_reference() {
        let form = form();
        let top = root(form.clone());
        assert!(check(nefield, &Value::from("x"), "Missing", &form, &top));
        assert!(!check(nefield, &Value::from("rahasia"), "Password", &form, &top));
    }

    #[test]
    fn test_ordering_fields() {
        let form = form();
        let top = root(form.clone());
        assert!(check(gtfield, &Value::Int(6), "Start", &form, &top));
        assert!(!check(gtfield, &Value::Int(5), "Start", &form, &top));
        assert!(check(gtefield, &Value::Int(5), "Start", &form, &top));
        assert!(check(ltfield, &Value::Int(4), "Start", &form, &top));
        assert!(check(ltefield, &Value::Int(5), "Start", &form, &top));
        assert!(!check(ltfield, &Value::from("abc"), "Start", &form, &top));
    }

    #[test]
    fn test_ordering_across_signedness() {
        let form = form();
        let top = root(form.clone());
        assert!(check(gtfield, &Value::Int(10), "Count", &form, &top));
        assert!(check(ltfield, &Value::Int(-1), "Count", &form, &top));
        assert!(!check(gtfield, &Value::Int(5), "Count", &form, &top));
        assert!(check(ltefield, &Value::Uint(5), "Start", &form, &top));
    }

    #[test]
    fn test_signed_unsigned_equality() {
        let form = form();
        let top = root(form.clone());
        assert!(check(eqfield, &Value::Int(5), "Count", &form, &top));
        assert!(!check(eqfield, &Value::Int(-5), "Count", &form, &top));
    }

    #[test]
    fn test_cross_struct_uses_top() {
        let form = form();
        let top = root(form.clone());
        assert!(check(eqcsfield, &Value::from("roni"), "Owner", &form, &top));
        assert!(check(eqcsfield, &Value::Int(5), "Form.Start", &form, &top));
        assert!(!check(eqcsfield, &Value::from("roni"), "Password", &form, &top));
        assert!(check(necsfield, &Value::from("budi"), "Owner", &form, &top));
    }
}
