//! Compiled rule plans
//!
//! A [`RulePlan`] is a rule expression with aliases expanded, rules
//! resolved against the registry and the `dive`/`keys` directives lifted
//! into a nested [`DivePlan`]. Plans are immutable and shared through the
//! validator's cache.

use std::fmt;
use std::iter::Peekable;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::foundation::StructuralError;
use crate::registry::{ParamSpec, RuleEntry, RuleRegistry};
use crate::tag::parser::{
    Directive, TagAlt, TagExpr, TagGroup, check_group, check_sequence, parse_tag,
};

/// Alias expansion deeper than this is treated as a cycle.
const MAX_ALIAS_DEPTH: usize = 16;

/// Compiled form of one rule expression.
#[derive(Debug, Clone, Default)]
pub struct RulePlan {
    source: String,
    skip: bool,
    steps: Vec<PlanStep>,
    dive: Option<Box<DivePlan>>,
}

impl RulePlan {
    /// The expression this plan was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True for `-`: the field is ignored, including recursion.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        self.skip
    }

    /// Steps applied to the value itself, before any dive.
    #[must_use]
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Rule groups, in order, ignoring `omitempty` markers.
    pub fn groups(&self) -> impl Iterator<Item = &RuleGroup> {
        self.steps.iter().filter_map(|step| match step {
            PlanStep::Check(group) => Some(group),
            PlanStep::OmitEmpty => None,
        })
    }

    /// Nested plan applied to elements, if the expression dives.
    #[must_use]
    pub fn dive(&self) -> Option<&DivePlan> {
        self.dive.as_deref()
    }
}

/// Rules for the elements (and, for mappings, the keys) of a collection.
#[derive(Debug, Clone)]
pub struct DivePlan {
    pub keys: Option<RulePlan>,
    pub elements: RulePlan,
}

#[derive(Debug, Clone)]
pub enum PlanStep {
    /// Stop here when the value is zero.
    OmitEmpty,
    Check(RuleGroup),
}

/// OR alternatives; the group passes when any alternative passes.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    alternatives: SmallVec<[RuleRef; 2]>,
    required: bool,
}

impl RuleGroup {
    #[must_use]
    pub fn alternatives(&self) -> &[RuleRef] {
        &self.alternatives
    }

    /// The reported alternative when the group fails.
    #[must_use]
    pub fn first(&self) -> &RuleRef {
        &self.alternatives[0]
    }

    /// True when the group is a lone `required`.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// A resolved rule occurrence.
#[derive(Clone)]
pub struct RuleRef {
    pub name: String,
    pub param: Option<String>,
    /// Outermost alias this occurrence was expanded from.
    pub alias: Option<String>,
    pub(crate) rule: Arc<RuleEntry>,
}

impl fmt::Debug for RuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRef")
            .field("name", &self.name)
            .field("param", &self.param)
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// COMPILATION
// ============================================================================

/// A group after alias expansion, with the alias label of each alternative.
struct Expanded {
    group: TagGroup,
    aliases: SmallVec<[Option<String>; 2]>,
}

/// Compiles `tag` against `registry`.
pub fn compile(tag: &str, registry: &RuleRegistry) -> Result<RulePlan, StructuralError> {
    let expr = parse_tag(tag)?;

    let mut expanded = Vec::with_capacity(expr.groups().len());
    for group in expr.groups() {
        expand_group(tag, group, None, registry, 0, &mut expanded)?;
    }
    check_sequence(tag, expanded.iter().map(|e| &e.group))?;

    let mut groups = expanded.into_iter().peekable();
    build(tag, &mut groups, registry)
}

fn expand_group(
    tag: &str,
    group: &TagGroup,
    label: Option<&str>,
    registry: &RuleRegistry,
    depth: usize,
    out: &mut Vec<Expanded>,
) -> Result<(), StructuralError> {
    if depth > MAX_ALIAS_DEPTH {
        return Err(StructuralError::malformed(
            tag,
            "alias expansion does not terminate",
        ));
    }

    if let [alt] = group.alternatives()
        && let Some(body) = registry.alias(&alt.name)
    {
        if alt.param.is_some() {
            return Err(StructuralError::malformed(
                tag,
                format!("alias `{}` takes no parameter", alt.name),
            ));
        }
        let label = label.unwrap_or(&alt.name);
        for inner in parse_alias(tag, &alt.name, body)?.groups() {
            expand_group(tag, inner, Some(label), registry, depth + 1, out)?;
        }
        return Ok(());
    }

    let mut alternatives: SmallVec<[TagAlt; 2]> = SmallVec::new();
    let mut aliases: SmallVec<[Option<String>; 2]> = SmallVec::new();
    for alt in group.alternatives() {
        let Some(body) = registry.alias(&alt.name) else {
            alternatives.push(alt.clone());
            aliases.push(label.map(str::to_owned));
            continue;
        };

        let inner = parse_alias(tag, &alt.name, body)?;
        let [single] = inner.groups() else {
            return Err(StructuralError::malformed(
                tag,
                format!("alias `{}` must expand to a single group inside an OR", alt.name),
            ));
        };
        let mut nested = Vec::with_capacity(1);
        let inner_label = label.unwrap_or(&alt.name);
        expand_group(tag, single, Some(inner_label), registry, depth + 1, &mut nested)?;
        if nested.len() != 1 {
            return Err(StructuralError::malformed(
                tag,
                format!("alias `{}` must expand to a single group inside an OR", alt.name),
            ));
        }
        for part in nested {
            alternatives.extend(part.group.alternatives().iter().cloned());
            aliases.extend(part.aliases);
        }
    }

    let group = TagGroup::new(alternatives);
    check_group(tag, &group)?;
    out.push(Expanded { group, aliases });
    Ok(())
}

/// Parses an alias body, attributing syntax errors to the expression that
/// used the alias.
fn parse_alias(tag: &str, alias: &str, body: &str) -> Result<TagExpr, StructuralError> {
    parse_tag(body).map_err(|err| match err {
        StructuralError::MalformedTag { reason, .. } => {
            StructuralError::malformed(tag, format!("alias `{alias}` (`{body}`): {reason}"))
        }
        other => other,
    })
}

fn build<I>(
    tag: &str,
    groups: &mut Peekable<I>,
    registry: &RuleRegistry,
) -> Result<RulePlan, StructuralError>
where
    I: Iterator<Item = Expanded>,
{
    let mut plan = RulePlan {
        source: tag.to_owned(),
        ..RulePlan::default()
    };

    while let Some(expanded) = groups.next() {
        match expanded.group.directive() {
            Some(Directive::Skip) => plan.skip = true,
            Some(Directive::OmitEmpty) => plan.steps.push(PlanStep::OmitEmpty),
            Some(Directive::EndKeys) => break,
            Some(Directive::Dive) => {
                let keys = if groups
                    .peek()
                    .is_some_and(|next| next.group.directive() == Some(Directive::Keys))
                {
                    groups.next();
                    Some(build(tag, groups, registry)?)
                } else {
                    None
                };
                let elements = build(tag, groups, registry)?;
                plan.dive = Some(Box::new(DivePlan { keys, elements }));
                break;
            }
            Some(Directive::Keys) => {
                return Err(StructuralError::malformed(
                    tag,
                    "`keys` must immediately follow `dive`",
                ));
            }
            None => plan.steps.push(PlanStep::Check(resolve(tag, expanded, registry)?)),
        }
    }

    Ok(plan)
}

fn resolve(
    tag: &str,
    expanded: Expanded,
    registry: &RuleRegistry,
) -> Result<RuleGroup, StructuralError> {
    let mut alternatives: SmallVec<[RuleRef; 2]> = SmallVec::new();

    for (alt, alias) in expanded.group.alternatives().iter().zip(expanded.aliases) {
        let rule = registry.lookup(&alt.name)?;
        match (rule.param_spec(), &alt.param) {
            (ParamSpec::Required, None) => {
                return Err(StructuralError::malformed(
                    tag,
                    format!("rule `{}` requires a parameter", alt.name),
                ));
            }
            (ParamSpec::None, Some(_)) => {
                return Err(StructuralError::malformed(
                    tag,
                    format!("rule `{}` takes no parameter", alt.name),
                ));
            }
            _ => {}
        }
        alternatives.push(RuleRef {
            name: alt.name.clone(),
            param: alt.param.clone(),
            alias,
            rule,
        });
    }

    let required = matches!(alternatives.as_slice(), [only] if only.name == "required");
    Ok(RuleGroup {
        alternatives,
        required,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rule_names(plan: &RulePlan) -> Vec<Vec<&str>> {
        plan.groups()
            .map(|g| g.alternatives().iter().map(|r| r.name.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_empty_plan() {
        let plan = compile("", &RuleRegistry::new()).unwrap();
        assert!(plan.steps().is_empty());
        assert!(plan.dive().is_none());
        assert!(!plan.is_skip());
    }

    #[test]
    fn test_flat_plan() {
        let plan = compile("required,min=5|eq=0", &RuleRegistry::new()).unwrap();
        assert_eq!(rule_names(&plan), vec![vec!["required"], vec!["min", "eq"]]);
        assert!(plan.groups().next().unwrap().is_required());
        assert!(!plan.groups().nth(1).unwrap().is_required());
    }

    #[test]
    fn test_dive_with_keys() {
        let plan = compile(
            "required,dive,keys,required,min=2,endkeys,required",
            &RuleRegistry::new(),
        )
        .unwrap();
        assert_eq!(rule_names(&plan), vec![vec!["required"]]);

        let dive = plan.dive().unwrap();
        assert_eq!(
            rule_names(dive.keys.as_ref().unwrap()),
            vec![vec!["required"], vec!["min"]]
        );
        assert_eq!(rule_names(&dive.elements), vec![vec!["required"]]);
    }

    #[test]
    fn test_nested_dive() {
        let plan = compile("dive,min=1,dive,required", &RuleRegistry::new()).unwrap();
        let outer = plan.dive().unwrap();
        assert_eq!(rule_names(&outer.elements), vec![vec!["min"]]);
        let inner = outer.elements.dive().unwrap();
        assert_eq!(rule_names(&inner.elements), vec![vec!["required"]]);
    }

    #[test]
    fn test_omitempty_keeps_position() {
        let plan = compile("min=1,omitempty,email", &RuleRegistry::new()).unwrap();
        assert!(matches!(
            plan.steps(),
            [PlanStep::Check(_), PlanStep::OmitEmpty, PlanStep::Check(_)]
        ));
    }

    #[test]
    fn test_alias_expansion_records_alias() {
        let mut registry = RuleRegistry::new();
        registry.register_alias("varchar", "required,max=255").unwrap();

        let plan = compile("varchar,min=5", &registry).unwrap();
        let refs: Vec<_> = plan
            .groups()
            .map(|g| (g.first().name.as_str(), g.first().alias.as_deref()))
            .collect();
        assert_eq!(
            refs,
            vec![
                ("required", Some("varchar")),
                ("max", Some("varchar")),
                ("min", None),
            ]
        );
    }

    #[test]
    fn test_nested_alias_keeps_outermost_name() {
        let mut registry = RuleRegistry::new();
        registry.register_alias("inner", "min=3").unwrap();
        registry.register_alias("outer", "required,inner").unwrap();

        let plan = compile("outer", &registry).unwrap();
        let aliases: Vec<_> = plan.groups().map(|g| g.first().alias.as_deref()).collect();
        assert_eq!(aliases, vec![Some("outer"), Some("outer")]);
    }

    #[test]
    fn test_alias_inside_or_must_be_single_group() {
        let mut registry = RuleRegistry::new();
        registry.register_alias("short", "min=1|eq=0").unwrap();
        registry.register_alias("varchar", "required,max=255").unwrap();

        let plan = compile("short|email", &registry).unwrap();
        assert_eq!(rule_names(&plan), vec![vec!["min", "eq", "email"]]);

        let err = compile("varchar|email", &registry).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_TAG");
    }

    #[test]
    fn test_malformed_alias_body_names_the_using_tag() {
        let mut registry = RuleRegistry::new();
        registry.register_alias("broken", "required,,min=1").unwrap();

        let err = compile("email,broken", &registry).unwrap_err();
        let (tag, reason) = match err {
            StructuralError::MalformedTag { tag, reason } => (tag, reason),
            other => panic!("expected MalformedTag, got {other:?}"),
        };
        assert_eq!(tag, "email,broken");
        assert!(reason.starts_with("alias `broken` (`required,,min=1`):"), "{reason}");
    }

    #[test]
    fn test_alias_cycle_is_malformed() {
        let mut registry = RuleRegistry::new();
        registry.register_alias("ping", "pong").unwrap();
        registry.register_alias("pong", "ping").unwrap();

        let err = compile("ping", &registry).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_TAG");
    }

    #[test]
    fn test_unknown_rule() {
        let err = compile("required,bogus", &RuleRegistry::new()).unwrap_err();
        assert_eq!(
            err,
            StructuralError::UnknownRule {
                name: "bogus".into()
            }
        );
    }

    #[test]
    fn test_missing_required_param() {
        let err = compile("min", &RuleRegistry::new()).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_TAG");
        assert!(err.to_string().contains("requires a parameter"));
    }

    #[test]
    fn test_param_on_parameterless_rule() {
        let err = compile("email=x", &RuleRegistry::new()).unwrap_err();
        assert!(err.to_string().contains("takes no parameter"));
    }
}
