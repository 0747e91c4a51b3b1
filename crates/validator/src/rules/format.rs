//! String format rules
//!
//! Patterns are compiled once on first use. A null value never matches;
//! non-string values fault, except that numbers always satisfy `numeric`
//! and `number`.

use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::{RuleFault, Value};
use crate::level::FieldLevel;

static NUMERIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").unwrap());

static NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

static ALPHA_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHANUM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap()
});

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s/?#]+[^\s]*$").unwrap()
});

fn text<'a>(fl: &FieldLevel<'a>) -> Result<Option<&'a str>, RuleFault> {
    match fl.value() {
        Value::Str(s) => Ok(Some(s.as_ref())),
        Value::Null => Ok(None),
        other => Err(RuleFault::unsupported(other.kind())),
    }
}

fn matches(fl: &FieldLevel<'_>, pattern: &Regex) -> Result<bool, RuleFault> {
    Ok(text(fl)?.is_some_and(|s| pattern.is_match(s)))
}

/// `numeric`: an optionally signed decimal.
pub fn numeric(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    match fl.value() {
        Value::Int(_) | Value::Uint(_) | Value::Float(_) => Ok(true),
        _ => matches(fl, &NUMERIC_REGEX),
    }
}

/// `number`: digits only.
pub fn number(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    match fl.value() {
        Value::Int(_) | Value::Uint(_) | Value::Float(_) => Ok(true),
        _ => matches(fl, &NUMBER_REGEX),
    }
}

pub fn alpha(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    matches(fl, &ALPHA_REGEX)
}

pub fn alphanum(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    matches(fl, &ALPHANUM_REGEX)
}

pub fn email(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    matches(fl, &EMAIL_REGEX)
}

/// `url`: an absolute URL with a scheme and a host.
pub fn url(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    matches(fl, &URL_REGEX)
}

/// `lowercase`: non-empty and unchanged by lowercasing.
pub fn lowercase(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(text(fl)?.is_some_and(|s| !s.is_empty() && s == s.to_lowercase()))
}

/// `uppercase`: non-empty and unchanged by uppercasing.
pub fn uppercase(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(text(fl)?.is_some_and(|s| !s.is_empty() && s == s.to_uppercase()))
}
