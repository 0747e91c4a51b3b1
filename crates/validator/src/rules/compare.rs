//! Size and comparison rules
//!
//! Numbers compare by value against a parameter of the same kind. Strings
//! compare by character count; sequences and mappings by element count.

use std::cmp::Ordering;

use crate::foundation::{RuleFault, Value};
use crate::level::FieldLevel;

/// Orders the value against the parameter. `None` for a null value.
fn ordering(fl: &FieldLevel<'_>) -> Result<Option<Ordering>, RuleFault> {
    let value = fl.value();
    let ordering = match value {
        Value::Int(n) => n.partial_cmp(&fl.param_i64()?),
        Value::Uint(n) => n.partial_cmp(&fl.param_u64()?),
        Value::Float(n) => n.partial_cmp(&fl.param_f64()?),
        Value::Str(_) | Value::Seq(_) | Value::Map(_) => {
            let limit = fl.param_usize()?;
            value.len().map(|len| len.cmp(&limit))
        }
        Value::Null => None,
        Value::Bool(_) | Value::Struct(_) => return Err(RuleFault::unsupported(value.kind())),
    };
    Ok(ordering)
}

/// `len=N`
pub fn len(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(ordering(fl)? == Some(Ordering::Equal))
}

/// `min=N`
pub fn min(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    gte(fl)
}

/// `max=N`
pub fn max(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    lte(fl)
}

pub fn gt(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(ordering(fl)? == Some(Ordering::Greater))
}

pub fn gte(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(matches!(
        ordering(fl)?,
        Some(Ordering::Greater | Ordering::Equal)
    ))
}

pub fn lt(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(ordering(fl)? == Some(Ordering::Less))
}

pub fn lte(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(matches!(ordering(fl)?, Some(Ordering::Less | Ordering::Equal)))
}

/// `eq=X`: strings compare with the parameter text, everything else like
/// `len`.
pub fn eq(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    match fl.value() {
        Value::Str(s) => Ok(fl.param() == Some(s.as_ref())),
        Value::Bool(b) => Ok(*b == fl.param_bool()?),
        _ => len(fl),
    }
}

/// `ne=X`
pub fn ne(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    eq(fl).map(|equal| !equal)
}

/// `oneof=a b c`: the value's text is one of the space-separated options.
pub fn oneof(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    let value = fl.value();
    match value {
        Value::Str(_) | Value::Int(_) | Value::Uint(_) | Value::Float(_) => {
            let text = value.to_string();
            Ok(fl
                .param()
                .unwrap_or_default()
                .split_whitespace()
                .any(|option| option == text))
        }
        Value::Null => Ok(false),
        other => Err(RuleFault::unsupported(other.kind())),
    }
}
