//! Traversal engine
//!
//! Walks an inspected value tree against compiled rule plans and collects
//! failures in traversal order: fields in declaration order, rule groups
//! in sequence, then elements or keys of dived collections.

use tracing::warn;

use crate::foundation::{StructuralError, ValidationError, ValidationErrors, Value};
use crate::level::{FieldLevel, StructLevel};
use crate::rules::default_message;
use crate::tag::{DivePlan, PlanStep, RuleGroup, RulePlan};
use crate::validator::Validator;

/// Appends `field` to `prefix` with a dot.
pub(crate) fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_owned()
    } else {
        format!("{prefix}.{field}")
    }
}

// ============================================================================
// COLLECTOR
// ============================================================================

/// Error accumulator owned by one validation call.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    errors: ValidationErrors,
    fail_fast: bool,
}

impl Collector {
    pub(crate) fn new(fail_fast: bool) -> Self {
        Self {
            errors: ValidationErrors::new(),
            fail_fast,
        }
    }

    /// Records `error` unless fail-fast already stopped the call.
    pub(crate) fn push(&mut self, error: ValidationError) {
        if !self.halted() {
            self.errors.add(error);
        }
    }

    pub(crate) fn halted(&self) -> bool {
        self.fail_fast && self.errors.has_errors()
    }

    pub(crate) fn finish(self) -> ValidationErrors {
        self.errors
    }
}

// ============================================================================
// TRAVERSAL
// ============================================================================

/// One validation call in progress.
pub(crate) struct Traversal<'a> {
    validator: &'a Validator,
    top: &'a Value<'a>,
    collector: Collector,
}

/// Where a value sits in the tree.
#[derive(Clone, Copy)]
struct Location<'a> {
    path: &'a str,
    field: &'a str,
    parent: Option<&'a Value<'a>>,
}

impl<'a> Traversal<'a> {
    pub(crate) fn new(validator: &'a Validator, top: &'a Value<'a>) -> Self {
        Self {
            validator,
            top,
            collector: Collector::new(validator.config().fail_fast),
        }
    }

    pub(crate) fn finish(self) -> ValidationErrors {
        self.collector.finish()
    }

    /// Applies `plan` to a standalone value.
    pub(crate) fn visit_value(
        &mut self,
        plan: &RulePlan,
        value: &'a Value<'a>,
        parent: Option<&'a Value<'a>>,
    ) -> Result<(), StructuralError> {
        let at = Location {
            path: "",
            field: "",
            parent,
        };
        self.walk(plan, value, at)
    }

    /// Validates every field of `value` (a struct), then runs its hook.
    pub(crate) fn visit_struct(
        &mut self,
        value: &'a Value<'a>,
        prefix: &str,
    ) -> Result<(), StructuralError> {
        let Value::Struct(current) = value else {
            return Ok(());
        };

        for field in current.fields() {
            if self.collector.halted() {
                return Ok(());
            }
            let plan = self.validator.plan(field.rules())?;
            let path = join_path(prefix, field.name());
            let at = Location {
                path: &path,
                field: field.name(),
                parent: Some(value),
            };
            self.walk(&plan, field.value(), at)?;
        }

        if self.collector.halted() {
            return Ok(());
        }
        if let Some(hook) = self.validator.struct_hook(current.type_id()) {
            let mut level = StructLevel::new(
                self.validator,
                current,
                self.top,
                prefix,
                &mut self.collector,
            );
            hook(&mut level);
        }
        Ok(())
    }

    fn walk(
        &mut self,
        plan: &RulePlan,
        value: &'a Value<'a>,
        at: Location<'_>,
    ) -> Result<(), StructuralError> {
        if plan.is_skip() {
            return Ok(());
        }

        let is_struct = matches!(value, Value::Struct(_));
        let apply_rules = !is_struct || self.validator.config().required_struct_enabled;

        for step in plan.steps() {
            if self.collector.halted() {
                return Ok(());
            }
            match step {
                PlanStep::OmitEmpty if value.is_zero() => return Ok(()),
                PlanStep::OmitEmpty => {}
                PlanStep::Check(_) if !apply_rules => {}
                PlanStep::Check(group) => {
                    let passed = self.check_group(group, value, at)?;
                    if !passed && group.is_required() && value.is_zero() {
                        return Ok(());
                    }
                }
            }
        }

        if let Some(dive) = plan.dive() {
            self.dive(plan, dive, value, at)
        } else if is_struct {
            self.visit_struct(value, at.path)
        } else {
            Ok(())
        }
    }

    fn dive(
        &mut self,
        plan: &RulePlan,
        dive: &DivePlan,
        value: &'a Value<'a>,
        at: Location<'_>,
    ) -> Result<(), StructuralError> {
        match value {
            Value::Seq(_) if dive.keys.is_some() => Err(StructuralError::malformed(
                plan.source(),
                format!("`keys` used on a sequence at `{}`; it applies to mappings only", at.path),
            )),
            Value::Seq(items) => {
                for (index, item) in items.iter().enumerate() {
                    if self.collector.halted() {
                        break;
                    }
                    let path = format!("{}[{index}]", at.path);
                    let field = format!("{}[{index}]", at.field);
                    let element = Location {
                        path: &path,
                        field: &field,
                        parent: at.parent,
                    };
                    self.walk(&dive.elements, item, element)?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                for (key, item) in entries {
                    if self.collector.halted() {
                        break;
                    }
                    let path = format!("{}[{key}]", at.path);
                    let field = format!("{}[{key}]", at.field);
                    let element = Location {
                        path: &path,
                        field: &field,
                        parent: at.parent,
                    };
                    if let Some(keys) = &dive.keys {
                        self.walk(keys, key, element)?;
                    }
                    self.walk(&dive.elements, item, element)?;
                }
                Ok(())
            }
            Value::Null => Ok(()),
            other => Err(StructuralError::malformed(
                plan.source(),
                format!("cannot dive into a {} value at `{}`", other.kind(), at.path),
            )),
        }
    }

    /// Evaluates one OR group; records an error and returns `false` when no
    /// alternative passes.
    fn check_group(
        &mut self,
        group: &RuleGroup,
        value: &'a Value<'a>,
        at: Location<'_>,
    ) -> Result<bool, StructuralError> {
        for alt in group.alternatives() {
            let fl = FieldLevel {
                value,
                param: alt.param.as_deref(),
                rule: &alt.name,
                path: at.path,
                field: at.field,
                parent: at.parent,
                top: self.top,
            };
            match alt.rule.check(&fl) {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(fault) => {
                    warn!(
                        rule = %alt.name,
                        path = %at.path,
                        reason = %fault,
                        "rule faulted"
                    );
                    return Err(StructuralError::RuleFault {
                        rule: alt.name.clone(),
                        path: at.path.to_owned(),
                        reason: fault.reason().to_owned(),
                    });
                }
            }
        }

        let first = group.first();
        let param = first.param.as_deref();
        let message = default_message(&first.name, param);
        let mut error = ValidationError::new(first.name.clone(), message)
            .at(at.path, at.field)
            .with_value(value.to_string());
        if let Some(param) = param {
            error = error.with_param(param);
        }
        if let Some(alias) = &first.alias {
            error = error.with_alias(alias.clone());
        }
        self.collector.push(error);
        Ok(false)
    }
}
