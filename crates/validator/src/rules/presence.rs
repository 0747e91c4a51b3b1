//! Presence rules

use crate::foundation::RuleFault;
use crate::level::FieldLevel;

/// `required`: the value is not the zero value of its type.
pub fn required(fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
    Ok(!fl.value().is_zero())
}
