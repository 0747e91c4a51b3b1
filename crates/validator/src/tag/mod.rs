//! Rule expressions: parsing and compilation into plans

pub mod parser;
pub mod plan;

pub use parser::{Directive, TagAlt, TagExpr, TagGroup, parse_tag};
pub use plan::{DivePlan, PlanStep, RuleGroup, RulePlan, RuleRef, compile};
