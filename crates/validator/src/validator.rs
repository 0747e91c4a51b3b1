//! The validator facade: registration, plan cache, entry points

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::engine::Traversal;
use crate::foundation::{
    Error, Inspect, RuleFault, StructuralError, ValidationErrors, ValidatorConfig, Value,
};
use crate::level::{FieldLevel, StructLevel};
use crate::registry::{ParamSpec, RuleRegistry};
use crate::tag::{RulePlan, compile};

/// Upper bound on cached plans; tags built at runtime evict old entries.
const MAX_CACHED_PLANS: usize = 1024;

/// A struct-level hook.
pub type StructHook = Arc<dyn Fn(&mut StructLevel<'_>) + Send + Sync>;

/// Validates values against rule expressions.
///
/// Configure with the `register*` methods (they take `&mut self`), then
/// share: a configured validator is `Send + Sync` and is usually kept in an
/// `Arc`.
///
/// # Examples
///
/// ```rust
/// use tagcheck_validator::Validator;
///
/// let validator = Validator::new();
///
/// let errors = validator.validate_value("roni", "required,min=5").unwrap();
/// assert_eq!(errors.summary(), vec![("", "min")]);
///
/// let errors = validator.validate_value("roni@example.com", "required,email").unwrap();
/// assert!(errors.is_empty());
/// ```
pub struct Validator {
    config: ValidatorConfig,
    registry: RuleRegistry,
    struct_hooks: HashMap<TypeId, StructHook>,
    plans: RwLock<HashMap<String, Arc<RulePlan>>>,
}

impl Validator {
    /// A validator with the built-in rules and the default configuration.
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            config,
            registry: RuleRegistry::new().with_override(config.allow_override),
            struct_hooks: HashMap::new(),
            plans: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    /// Registers a custom rule taking an optional parameter.
    ///
    /// ```rust
    /// use tagcheck_validator::Validator;
    ///
    /// let mut validator = Validator::new();
    /// validator
    ///     .register("username", |fl| {
    ///         let name = fl.value().as_str().unwrap_or_default();
    ///         Ok(name.len() >= 5 && name == name.to_uppercase())
    ///     })
    ///     .unwrap();
    ///
    /// assert!(validator.validate_value("RONIX", "username").unwrap().is_empty());
    /// assert!(validator.validate_value("roni", "username").unwrap().has_errors());
    /// ```
    pub fn register<F>(&mut self, name: impl Into<String>, check: F) -> Result<(), StructuralError>
    where
        F: Fn(&FieldLevel<'_>) -> Result<bool, RuleFault> + Send + Sync + 'static,
    {
        self.register_with_param(name, ParamSpec::Optional, check)
    }

    /// Registers a custom rule, declaring whether it takes a parameter.
    pub fn register_with_param<F>(
        &mut self,
        name: impl Into<String>,
        param: ParamSpec,
        check: F,
    ) -> Result<(), StructuralError>
    where
        F: Fn(&FieldLevel<'_>) -> Result<bool, RuleFault> + Send + Sync + 'static,
    {
        let name = name.into();
        self.registry.register(name.clone(), param, check)?;
        self.invalidate_plans();
        debug!(rule = %name, ?param, "registered rule");
        Ok(())
    }

    /// Registers `name` as shorthand for the rule expression `expr`.
    pub fn register_alias(
        &mut self,
        name: impl Into<String>,
        expr: impl Into<String>,
    ) -> Result<(), StructuralError> {
        let name = name.into();
        let expr = expr.into();
        self.registry.register_alias(name.clone(), expr.clone())?;
        self.invalidate_plans();
        debug!(alias = %name, expr = %expr, "registered alias");
        Ok(())
    }

    /// Registers a hook run after the fields of every `T` traversed.
    ///
    /// A later registration for the same type replaces the earlier one.
    pub fn register_struct_validation<T, F>(&mut self, hook: F)
    where
        T: Any,
        F: Fn(&mut StructLevel<'_>) + Send + Sync + 'static,
    {
        self.struct_hooks.insert(TypeId::of::<T>(), Arc::new(hook));
        debug!(
            target_type = std::any::type_name::<T>(),
            "registered struct validation"
        );
    }

    fn invalidate_plans(&mut self) {
        self.plans.get_mut().clear();
    }

    // ========================================================================
    // PLANS
    // ========================================================================

    /// The compiled plan for `tag`, compiling and caching it on first use.
    ///
    /// The cache holds at most 1024 plans. Tags are expected to be static
    /// strings; dynamically built tags still work but evict older plans.
    pub fn plan(&self, tag: &str) -> Result<Arc<RulePlan>, StructuralError> {
        if let Some(plan) = self.plans.read().get(tag) {
            trace!(tag, "plan cache hit");
            return Ok(Arc::clone(plan));
        }

        let compiled = Arc::new(compile(tag, &self.registry)?);
        debug!(tag, "compiled rule plan");

        let mut plans = self.plans.write();
        if let Some(plan) = plans.get(tag) {
            return Ok(Arc::clone(plan));
        }
        if plans.len() >= MAX_CACHED_PLANS
            && let Some(evicted) = plans.keys().next().cloned()
        {
            plans.remove(&evicted);
            trace!(tag = %evicted, "plan evicted");
        }
        plans.insert(tag.to_owned(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Number of cached plans.
    #[must_use]
    pub fn cached_plans(&self) -> usize {
        self.plans.read().len()
    }

    pub(crate) fn struct_hook(&self, type_id: TypeId) -> Option<&StructHook> {
        self.struct_hooks.get(&type_id)
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Validates a single value against `tag`.
    pub fn validate_value<T>(
        &self,
        value: &T,
        tag: &str,
    ) -> Result<ValidationErrors, StructuralError>
    where
        T: Inspect + ?Sized,
    {
        let plan = self.plan(tag)?;
        let root = value.inspect();
        let mut traversal = Traversal::new(self, &root);
        traversal.visit_value(&plan, &root, None)?;
        Ok(traversal.finish())
    }

    /// Validates `value` against `tag` with `other` standing in for the
    /// parent: `eqfield` with an empty parameter compares against `other`
    /// itself, a named parameter against a field of `other`.
    pub fn validate_value_with<T, U>(
        &self,
        value: &T,
        other: &U,
        tag: &str,
    ) -> Result<ValidationErrors, StructuralError>
    where
        T: Inspect + ?Sized,
        U: Inspect + ?Sized,
    {
        let plan = self.plan(tag)?;
        let root = value.inspect();
        let other = other.inspect();
        let mut traversal = Traversal::new(self, &other);
        traversal.visit_value(&plan, &root, Some(&other))?;
        Ok(traversal.finish())
    }

    /// Validates every field of a struct, recursively.
    pub fn validate_struct<T>(&self, value: &T) -> Result<ValidationErrors, StructuralError>
    where
        T: Inspect + ?Sized,
    {
        let root = value.inspect();
        if !matches!(root, Value::Struct(_)) {
            return Err(StructuralError::NotAStruct { found: root.kind() });
        }
        let mut traversal = Traversal::new(self, &root);
        traversal.visit_struct(&root, "")?;
        Ok(traversal.finish())
    }

    /// [`validate_struct`](Self::validate_struct) folded into one error.
    pub fn check_struct<T>(&self, value: &T) -> Result<(), Error>
    where
        T: Inspect + ?Sized,
    {
        self.validate_struct(value)?.into_result()?;
        Ok(())
    }

    /// [`validate_value`](Self::validate_value) folded into one error.
    pub fn check_value<T>(&self, value: &T, tag: &str) -> Result<(), Error>
    where
        T: Inspect + ?Sized,
    {
        self.validate_value(value, tag)?.into_result()?;
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("struct_hooks", &self.struct_hooks.len())
            .field("cached_plans", &self.cached_plans())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
