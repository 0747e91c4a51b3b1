//! Error types for validation failures and structural faults
//!
//! Two disjoint classes live here:
//!
//! - [`ValidationError`] / [`ValidationErrors`]: data-driven failures, one
//!   entry per failed rule group, collected in traversal order.
//! - [`StructuralError`]: programmer or configuration mistakes (malformed
//!   rule expressions, unknown rules, name collisions, faulting predicates).
//!   These abort a validation call and are never mixed into a result.
//!
//! Rule names and default messages use `Cow<'static, str>` so the common
//! case of built-in rules does not allocate.

use std::borrow::Cow;
use std::fmt;

use crate::foundation::value::Kind;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A single failed rule occurrence.
///
/// # Examples
///
/// ```rust
/// use tagcheck_validator::ValidationError;
///
/// let error = ValidationError::new("min", "must be at least 5 characters")
///     .at("Username", "Username")
///     .with_param("5");
///
/// assert_eq!(error.rule, "min");
/// assert_eq!(error.param.as_deref(), Some("5"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Full path of the failing value.
    ///
    /// Examples: "Username", "Address[0].City", "Schools[SMP].Name"
    pub path: String,

    /// Leaf name of the failing value ("City", "Hobbies[0]").
    pub field: String,

    /// Name of the rule that failed.
    ///
    /// For an OR group this is the first alternative. When the rule came
    /// from an alias this is still the underlying rule, see [`Self::alias`].
    pub rule: Cow<'static, str>,

    /// Alias the failing rule was expanded from, if any.
    pub alias: Option<String>,

    /// Rule parameter (`5` for `min=5`), if any.
    pub param: Option<String>,

    /// Human-readable message in English.
    pub message: Cow<'static, str>,

    /// Rendering of the offending value.
    pub value: Option<String>,
}

impl ValidationError {
    /// Creates a new error for `rule` with a message and no location.
    pub fn new(rule: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            path: String::new(),
            field: String::new(),
            rule: rule.into(),
            alias: None,
            param: None,
            message: message.into(),
            value: None,
        }
    }

    /// Sets the full path and leaf name of the failing value.
    #[must_use = "builder methods must be chained or built"]
    pub fn at(mut self, path: impl Into<String>, field: impl Into<String>) -> Self {
        self.path = path.into();
        self.field = field.into();
        self
    }

    /// Sets the rule parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    /// Records the alias the rule was expanded from.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Records a rendering of the offending value.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// The tag as written on the field: the alias when there is one,
    /// otherwise the rule name.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.rule)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.rule, self.message)?;
        } else {
            write!(f, "[{}] {}: {}", self.path, self.rule, self.message)?;
        }

        if let Some(alias) = &self.alias {
            write!(f, " (alias: {alias})")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// ERROR COLLECTION
// ============================================================================

/// Ordered result of one validation call.
///
/// Insertion order is traversal order: field declaration order, then rule
/// order within a field, then element/key order for dived collections.
/// An empty collection is proof of validity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Creates a new empty error collection.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Adds an error to the collection.
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds multiple errors to the collection.
    pub fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        self.errors.extend(errors);
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns all errors.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Iterates over the errors in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Errors recorded for exactly `path`.
    pub fn for_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.path == path)
    }

    /// `(path, rule)` pairs, handy for assertions and logging.
    #[must_use]
    pub fn summary(&self) -> Vec<(&str, &str)> {
        self.errors
            .iter()
            .map(|e| (e.path.as_str(), e.rule.as_ref()))
            .collect()
    }

    /// Converts to a Result.
    #[must_use = "result must be used"]
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// STRUCTURAL ERRORS
// ============================================================================

/// A programmer or configuration mistake detected while registering rules,
/// compiling a rule expression, or evaluating a rule.
///
/// Structural errors abort the validation call; fix the tag or the
/// registration instead of retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// The rule expression cannot be parsed or compiled.
    #[error("malformed rule expression `{tag}`: {reason}")]
    MalformedTag { tag: String, reason: String },

    /// A rule name is neither a registered rule nor an alias.
    #[error("unknown rule `{name}`")]
    UnknownRule { name: String },

    /// A rule or alias with this name already exists.
    #[error("rule `{name}` is already registered")]
    DuplicateRule { name: String },

    /// The name is a traversal directive or contains tag syntax.
    #[error("`{name}` is reserved and cannot be registered")]
    ReservedName { name: String },

    /// A rule predicate could not be evaluated (bad parameter, unsupported
    /// value kind).
    #[error("rule `{rule}` faulted on `{path}`: {reason}")]
    RuleFault {
        rule: String,
        path: String,
        reason: String,
    },

    /// `validate_struct` was handed something that is not a struct.
    #[error("expected a struct, found {found}")]
    NotAStruct { found: Kind },
}

impl StructuralError {
    pub(crate) fn malformed(tag: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTag {
            tag: tag.to_owned(),
            reason: reason.into(),
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedTag { .. } => "MALFORMED_TAG",
            Self::UnknownRule { .. } => "UNKNOWN_RULE",
            Self::DuplicateRule { .. } => "DUPLICATE_RULE",
            Self::ReservedName { .. } => "RESERVED_NAME",
            Self::RuleFault { .. } => "RULE_FAULT",
            Self::NotAStruct { .. } => "NOT_A_STRUCT",
        }
    }

    /// Structural errors are deterministic; retrying never helps.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Returned by a rule predicate that cannot evaluate its input.
///
/// The engine turns it into [`StructuralError::RuleFault`], adding the rule
/// name and field path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct RuleFault {
    reason: String,
}

impl RuleFault {
    /// Creates a fault with a free-form reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The parameter could not be parsed as `expected`.
    pub fn invalid_param(param: &str, expected: &str) -> Self {
        Self::new(format!("parameter `{param}` is not a valid {expected}"))
    }

    /// The rule does not apply to values of this kind.
    pub fn unsupported(kind: Kind) -> Self {
        Self::new(format!("unsupported value kind `{kind}`"))
    }

    /// The reason text.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

// ============================================================================
// COMBINED ERROR
// ============================================================================

/// Either class of failure, for callers that want a single `?`-able error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Configuration mistake; see [`StructuralError`].
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// The value broke one or more rules.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

impl Error {
    /// The validation failures, if this is not a structural error.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Structural(_) => None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
