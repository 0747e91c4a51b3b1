//! Rule expression parser
//!
//! ```text
//! expr  := group ("," group)*
//! group := alt ("|" alt)*
//! alt   := name ("=" param)?
//! ```
//!
//! Parsing is pure: it only checks syntax and directive placement. Rule
//! names are resolved against the registry when a plan is compiled.

use std::fmt;

use smallvec::SmallVec;

use crate::foundation::StructuralError;

/// Escape for a literal `,` inside a parameter.
const COMMA_ESCAPE: &str = "0x2C";

/// Escape for a literal `|` inside a parameter.
const PIPE_ESCAPE: &str = "0x7C";

/// Reserved names interpreted by the traversal engine rather than looked up
/// as rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `-`: ignore the field entirely.
    Skip,
    /// `omitempty`: stop when the value is zero.
    OmitEmpty,
    /// `dive`: apply the remaining groups to each element.
    Dive,
    /// `keys`: start of the key rules of a dived mapping.
    Keys,
    /// `endkeys`: end of the key rules.
    EndKeys,
}

impl Directive {
    /// Every reserved name.
    pub const NAMES: [&'static str; 5] = ["-", "omitempty", "dive", "keys", "endkeys"];

    /// The directive spelled `name`, if any.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "-" => Some(Self::Skip),
            "omitempty" => Some(Self::OmitEmpty),
            "dive" => Some(Self::Dive),
            "keys" => Some(Self::Keys),
            "endkeys" => Some(Self::EndKeys),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skip => "-",
            Self::OmitEmpty => "omitempty",
            Self::Dive => "dive",
            Self::Keys => "keys",
            Self::EndKeys => "endkeys",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// AST
// ============================================================================

/// A parsed rule expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagExpr {
    groups: Vec<TagGroup>,
}

impl TagExpr {
    /// Comma-separated groups in source order.
    #[must_use]
    pub fn groups(&self) -> &[TagGroup] {
        &self.groups
    }

    /// True for the empty expression.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// One comma-separated group: alternatives joined by `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup {
    alternatives: SmallVec<[TagAlt; 2]>,
}

impl TagGroup {
    pub(crate) fn new(alternatives: SmallVec<[TagAlt; 2]>) -> Self {
        Self { alternatives }
    }

    #[must_use]
    pub fn alternatives(&self) -> &[TagAlt] {
        &self.alternatives
    }

    /// The directive this group consists of, if it is one.
    #[must_use]
    pub fn directive(&self) -> Option<Directive> {
        match self.alternatives.as_slice() {
            [alt] if alt.param.is_none() => Directive::from_name(&alt.name),
            _ => None,
        }
    }
}

/// One alternative: a rule name with an optional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAlt {
    pub name: String,
    pub param: Option<String>,
}

// ============================================================================
// PARSING
// ============================================================================

/// Parses a rule expression.
///
/// ```rust
/// use tagcheck_validator::tag::parse_tag;
///
/// let expr = parse_tag("required,min=5|eq=0").unwrap();
/// assert_eq!(expr.groups().len(), 2);
/// assert_eq!(expr.groups()[1].alternatives()[1].param.as_deref(), Some("0"));
/// ```
pub fn parse_tag(tag: &str) -> Result<TagExpr, StructuralError> {
    if tag.is_empty() {
        return Ok(TagExpr::default());
    }

    let groups = tag
        .split(',')
        .map(|group| {
            let alternatives = group.split('|').map(parse_alt).collect();
            let group = TagGroup::new(alternatives);
            check_group(tag, &group)?;
            Ok(group)
        })
        .collect::<Result<Vec<_>, StructuralError>>()?;

    check_sequence(tag, &groups)?;
    Ok(TagExpr { groups })
}

fn parse_alt(alt: &str) -> TagAlt {
    match alt.split_once('=') {
        Some((name, param)) => TagAlt {
            name: name.to_owned(),
            param: Some(unescape(param)),
        },
        None => TagAlt {
            name: alt.to_owned(),
            param: None,
        },
    }
}

fn unescape(param: &str) -> String {
    param.replace(COMMA_ESCAPE, ",").replace(PIPE_ESCAPE, "|")
}

/// Checks a single group: non-empty names, directives stand alone.
pub(crate) fn check_group(tag: &str, group: &TagGroup) -> Result<(), StructuralError> {
    for alt in group.alternatives() {
        if alt.name.is_empty() {
            return Err(StructuralError::malformed(tag, "empty rule name"));
        }
        if let Some(directive) = Directive::from_name(&alt.name) {
            if group.alternatives().len() > 1 {
                return Err(StructuralError::malformed(
                    tag,
                    format!("`{directive}` cannot be part of an OR group"),
                ));
            }
            if alt.param.is_some() {
                return Err(StructuralError::malformed(
                    tag,
                    format!("`{directive}` takes no parameter"),
                ));
            }
        }
    }
    Ok(())
}

/// Checks directive placement across groups.
pub(crate) fn check_sequence<'g>(
    tag: &str,
    groups: impl IntoIterator<Item = &'g TagGroup>,
) -> Result<(), StructuralError> {
    let mut count = 0;
    let mut skip = false;
    let mut after_dive = false;
    let mut in_keys = false;

    for group in groups {
        count += 1;
        let directive = group.directive();
        match directive {
            Some(Directive::Skip) => skip = true,
            Some(Directive::Keys) if !after_dive => {
                return Err(StructuralError::malformed(
                    tag,
                    "`keys` must immediately follow `dive`",
                ));
            }
            Some(Directive::Keys) => in_keys = true,
            Some(Directive::EndKeys) if !in_keys => {
                return Err(StructuralError::malformed(
                    tag,
                    "`endkeys` without a matching `keys`",
                ));
            }
            Some(Directive::EndKeys) => in_keys = false,
            Some(Directive::Dive) if in_keys => {
                return Err(StructuralError::malformed(
                    tag,
                    "`dive` is not allowed inside `keys`",
                ));
            }
            _ => {}
        }
        after_dive = directive == Some(Directive::Dive);
    }

    if in_keys {
        return Err(StructuralError::malformed(
            tag,
            "`keys` without a matching `endkeys`",
        ));
    }
    if skip && count > 1 {
        return Err(StructuralError::malformed(
            tag,
            "`-` must be the only rule",
        ));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
