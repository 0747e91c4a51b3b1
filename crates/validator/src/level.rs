//! What rule predicates and struct-level hooks get to see

use std::any::Any;
use std::borrow::Cow;
use std::str::FromStr;

use crate::engine::{Collector, join_path};
use crate::foundation::{RuleFault, StructValue, ValidationError, Value};
use crate::rules::default_message;
use crate::validator::Validator;

// ============================================================================
// FIELD LEVEL
// ============================================================================

/// Context handed to a rule predicate for one value.
#[derive(Debug, Clone, Copy)]
pub struct FieldLevel<'a> {
    pub(crate) value: &'a Value<'a>,
    pub(crate) param: Option<&'a str>,
    pub(crate) rule: &'a str,
    pub(crate) path: &'a str,
    pub(crate) field: &'a str,
    pub(crate) parent: Option<&'a Value<'a>>,
    pub(crate) top: &'a Value<'a>,
}

impl<'a> FieldLevel<'a> {
    /// The value under test.
    #[must_use]
    pub fn value(&self) -> &'a Value<'a> {
        self.value
    }

    /// The rule parameter (`5` for `min=5`).
    #[must_use]
    pub fn param(&self) -> Option<&'a str> {
        self.param
    }

    /// Name of the rule being evaluated.
    #[must_use]
    pub fn rule(&self) -> &'a str {
        self.rule
    }

    /// Full path of the value.
    #[must_use]
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Leaf name of the value.
    #[must_use]
    pub fn field_name(&self) -> &'a str {
        self.field
    }

    /// The struct holding this value, or the comparison value given to
    /// `validate_value_with`.
    #[must_use]
    pub fn parent(&self) -> Option<&'a Value<'a>> {
        self.parent
    }

    /// The value the validation call started from.
    #[must_use]
    pub fn top(&self) -> &'a Value<'a> {
        self.top
    }

    /// A sibling of this value, by relative path.
    #[must_use]
    pub fn sibling(&self, path: &str) -> Option<&'a Value<'a>> {
        self.parent?.lookup(path)
    }

    /// The field named by the parameter, relative to the parent. An empty
    /// parameter names the parent itself.
    #[must_use]
    pub fn param_field(&self) -> Option<&'a Value<'a>> {
        match self.param {
            Some(path) if !path.is_empty() => self.sibling(path),
            _ => self.parent,
        }
    }

    /// The field named by the parameter, relative to the top-level value.
    #[must_use]
    pub fn cross_struct(&self) -> Option<&'a Value<'a>> {
        self.top.lookup(self.param.unwrap_or_default())
    }

    pub fn param_usize(&self) -> Result<usize, RuleFault> {
        self.parse_param("non-negative integer")
    }

    pub fn param_i64(&self) -> Result<i64, RuleFault> {
        self.parse_param("integer")
    }

    pub fn param_u64(&self) -> Result<u64, RuleFault> {
        self.parse_param("unsigned integer")
    }

    pub fn param_f64(&self) -> Result<f64, RuleFault> {
        self.parse_param("number")
    }

    pub fn param_bool(&self) -> Result<bool, RuleFault> {
        self.parse_param("boolean")
    }

    fn parse_param<T: FromStr>(&self, expected: &str) -> Result<T, RuleFault> {
        let param = self
            .param
            .ok_or_else(|| RuleFault::new("missing parameter"))?;
        param
            .trim()
            .parse()
            .map_err(|_| RuleFault::invalid_param(param, expected))
    }
}

// ============================================================================
// STRUCT LEVEL
// ============================================================================

/// Context handed to a struct-level hook after the struct's fields ran.
pub struct StructLevel<'a> {
    validator: &'a Validator,
    current: &'a StructValue<'a>,
    top: &'a Value<'a>,
    prefix: &'a str,
    collector: &'a mut Collector,
}

impl<'a> StructLevel<'a> {
    pub(crate) fn new(
        validator: &'a Validator,
        current: &'a StructValue<'a>,
        top: &'a Value<'a>,
        prefix: &'a str,
        collector: &'a mut Collector,
    ) -> Self {
        Self {
            validator,
            current,
            top,
            prefix,
            collector,
        }
    }

    /// Typed access to the struct being validated.
    #[must_use]
    pub fn current<T: Any>(&self) -> Option<&'a T> {
        self.current.downcast_ref::<T>()
    }

    /// The inspected struct being validated.
    #[must_use]
    pub fn current_value(&self) -> &'a StructValue<'a> {
        self.current
    }

    /// The value the validation call started from.
    #[must_use]
    pub fn top(&self) -> &'a Value<'a> {
        self.top
    }

    /// Path of the current struct ("" at the top level).
    #[must_use]
    pub fn path(&self) -> &'a str {
        self.prefix
    }

    /// The validator running the call, for nested `validate_value` calls.
    #[must_use]
    pub fn validator(&self) -> &'a Validator {
        self.validator
    }

    /// Records a failure of `tag` on `field` of the current struct.
    pub fn report_error(&mut self, field: &str, tag: &str, param: &str) {
        let param = (!param.is_empty()).then_some(param);
        let message = default_message(tag, param);
        self.push(field, tag, param, message);
    }

    /// Like [`report_error`](Self::report_error) with an explicit message.
    pub fn report_error_with_message(
        &mut self,
        field: &str,
        tag: &str,
        param: &str,
        message: impl Into<Cow<'static, str>>,
    ) {
        let param = (!param.is_empty()).then_some(param);
        self.push(field, tag, param, message.into());
    }

    /// Records a prepared error as-is.
    pub fn report(&mut self, error: ValidationError) {
        self.collector.push(error);
    }

    fn push(&mut self, field: &str, tag: &str, param: Option<&str>, message: Cow<'static, str>) {
        let mut error = ValidationError::new(tag.to_owned(), message)
            .at(join_path(self.prefix, field), field);
        if let Some(param) = param {
            error = error.with_param(param);
        }
        if let Some(value) = self.current.field(field) {
            error = error.with_value(value.to_string());
        }
        self.collector.push(error);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair;

    fn pair() -> Value<'static> {
        static PAIR: Pair = Pair;
        Value::Struct(
            StructValue::new("Pair", &PAIR)
                .with_field("Left", "", Value::Int(3))
                .with_field("Right", "", Value::from("x")),
        )
    }

    fn level<'a>(
        value: &'a Value<'a>,
        param: Option<&'a str>,
        parent: &'a Value<'a>,
    ) -> FieldLevel<'a> {
        FieldLevel {
            value,
            param,
            rule: "test",
            path: "Left",
            field: "Left",
            parent: Some(parent),
            top: parent,
        }
    }

    #[test]
    fn test_param_field_resolves_sibling() {
        let root = pair();
        let value = Value::Int(3);
        let fl = level(&value, Some("Right"), &root);
        assert_eq!(fl.param_field(), Some(&Value::from("x")));
    }

    #[test]
    fn test_empty_param_field_is_parent() {
        let root = pair();
        let value = Value::Int(3);
        let fl = level(&value, Some(""), &root);
        assert_eq!(fl.param_field(), Some(&root));
    }

    #[test]
    fn test_param_parsing() {
        let root = pair();
        let value = Value::Int(3);
        assert_eq!(level(&value, Some("12"), &root).param_usize(), Ok(12));
        assert_eq!(level(&value, Some("-4"), &root).param_i64(), Ok(-4));
        assert_eq!(level(&value, Some("true"), &root).param_bool(), Ok(true));

        let fault = level(&value, Some("abc"), &root).param_usize().unwrap_err();
        assert_eq!(
            fault.reason(),
            "parameter `abc` is not a valid non-negative integer"
        );
        assert!(level(&value, None, &root).param_f64().is_err());
    }
}
