//! Rule registry
//!
//! Maps rule names to predicates and alias names to rule expressions. A
//! fresh registry already holds the built-in rules.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::foundation::{RuleFault, StructuralError};
use crate::level::FieldLevel;
use crate::rules::{compare, cross_field, format, presence};
use crate::tag::Directive;

/// A rule predicate. `Ok(false)` is a validation failure; `Err` means the
/// rule could not be evaluated at all.
pub type RuleFn = Arc<dyn Fn(&FieldLevel<'_>) -> Result<bool, RuleFault> + Send + Sync>;

/// Whether a rule takes a parameter. Checked when a plan is compiled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamSpec {
    /// `email`
    None,
    /// Custom rules default to this.
    #[default]
    Optional,
    /// `min=5`
    Required,
}

/// A registered rule.
pub struct RuleEntry {
    name: String,
    param: ParamSpec,
    builtin: bool,
    check: RuleFn,
}

impl RuleEntry {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn param_spec(&self) -> ParamSpec {
        self.param
    }

    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    pub(crate) fn check(&self, fl: &FieldLevel<'_>) -> Result<bool, RuleFault> {
        (self.check)(fl)
    }
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEntry")
            .field("name", &self.name)
            .field("param", &self.param)
            .field("builtin", &self.builtin)
            .finish_non_exhaustive()
    }
}

/// Named rules and aliases.
pub struct RuleRegistry {
    rules: HashMap<String, Arc<RuleEntry>>,
    aliases: HashMap<String, String>,
    allow_override: bool,
}

impl RuleRegistry {
    /// Creates a registry holding every built-in rule.
    pub fn new() -> Self {
        let mut registry = Self {
            rules: HashMap::new(),
            aliases: HashMap::new(),
            allow_override: false,
        };

        registry.register_presence_rules();
        registry.register_comparison_rules();
        registry.register_format_rules();
        registry.register_cross_field_rules();

        registry
    }

    /// Lets later registrations replace existing rules and aliases.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_override(mut self, allow: bool) -> Self {
        self.allow_override = allow;
        self
    }

    /// Registers a rule.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        param: ParamSpec,
        check: F,
    ) -> Result<(), StructuralError>
    where
        F: Fn(&FieldLevel<'_>) -> Result<bool, RuleFault> + Send + Sync + 'static,
    {
        let name = name.into();
        self.claim(&name)?;
        self.aliases.remove(&name);
        self.rules.insert(
            name.clone(),
            Arc::new(RuleEntry {
                name,
                param,
                builtin: false,
                check: Arc::new(check),
            }),
        );
        Ok(())
    }

    /// Registers `name` as shorthand for the rule expression `expr`.
    ///
    /// The expression is stored verbatim; unknown rules in it surface when
    /// a tag using the alias is compiled.
    pub fn register_alias(
        &mut self,
        name: impl Into<String>,
        expr: impl Into<String>,
    ) -> Result<(), StructuralError> {
        let name = name.into();
        self.claim(&name)?;
        self.rules.remove(&name);
        self.aliases.insert(name, expr.into());
        Ok(())
    }

    /// The rule called `name`.
    pub fn lookup(&self, name: &str) -> Result<Arc<RuleEntry>, StructuralError> {
        self.rules
            .get(name)
            .cloned()
            .ok_or_else(|| StructuralError::UnknownRule {
                name: name.to_owned(),
            })
    }

    /// The rule called `name`, if registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RuleEntry> {
        self.rules.get(name).map(Arc::as_ref)
    }

    /// The expression behind alias `name`.
    #[must_use]
    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    /// Registered rule names, sorted.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn claim(&self, name: &str) -> Result<(), StructuralError> {
        if name.is_empty()
            || name.contains([',', '|', '='])
            || Directive::from_name(name).is_some()
        {
            return Err(StructuralError::ReservedName {
                name: name.to_owned(),
            });
        }
        let taken = self.rules.contains_key(name) || self.aliases.contains_key(name);
        if !self.allow_override && taken {
            return Err(StructuralError::DuplicateRule {
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    // Registration methods for each category

    fn builtin(
        &mut self,
        name: &'static str,
        param: ParamSpec,
        check: fn(&FieldLevel<'_>) -> Result<bool, RuleFault>,
    ) {
        self.rules.insert(
            name.to_owned(),
            Arc::new(RuleEntry {
                name: name.to_owned(),
                param,
                builtin: true,
                check: Arc::new(check),
            }),
        );
    }

    fn register_presence_rules(&mut self) {
        self.builtin("required", ParamSpec::None, presence::required);
    }

    fn register_comparison_rules(&mut self) {
        self.builtin("len", ParamSpec::Required, compare::len);
        self.builtin("min", ParamSpec::Required, compare::min);
        self.builtin("max", ParamSpec::Required, compare::max);
        self.builtin("eq", ParamSpec::Required, compare::eq);
        self.builtin("ne", ParamSpec::Required, compare::ne);
        self.builtin("gt", ParamSpec::Required, compare::gt);
        self.builtin("gte", ParamSpec::Required, compare::gte);
        self.builtin("lt", ParamSpec::Required, compare::lt);
        self.builtin("lte", ParamSpec::Required, compare::lte);
        self.builtin("oneof", ParamSpec::Required, compare::oneof);
    }

    fn register_format_rules(&mut self) {
        self.builtin("numeric", ParamSpec::None, format::numeric);
        self.builtin("number", ParamSpec::None, format::number);
        self.builtin("alpha", ParamSpec::None, format::alpha);
        self.builtin("alphanum", ParamSpec::None, format::alphanum);
        self.builtin("email", ParamSpec::None, format::email);
        self.builtin("url", ParamSpec::None, format::url);
        self.builtin("lowercase", ParamSpec::None, format::lowercase);
        self.builtin("uppercase", ParamSpec::None, format::uppercase);
    }

    fn register_cross_field_rules(&mut self) {
        // Current struct; an empty parameter compares against the parent.
        self.builtin("eqfield", ParamSpec::Optional, cross_field::eqfield);
        self.builtin("nefield", ParamSpec::Optional, cross_field::nefield);
        self.builtin("gtfield", ParamSpec::Optional, cross_field::gtfield);
        self.builtin("gtefield", ParamSpec::Optional, cross_field::gtefield);
        self.builtin("ltfield", ParamSpec::Optional, cross_field::ltfield);
        self.builtin("ltefield", ParamSpec::Optional, cross_field::ltefield);

        // Top-level root
        self.builtin("eqcsfield", ParamSpec::Required, cross_field::eqcsfield);
        self.builtin("necsfield", ParamSpec::Required, cross_field::necsfield);
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rule_names())
            .field("aliases", &self.aliases)
            .field("allow_override", &self.allow_override)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
