//! # lintgen-core
//!
//! Deterministic core of the rule-transformation pipeline: the data model
//! for rules, flags, and configuration fragments, the rule-file parser, the
//! flag-to-template builder, and the aggregator that merges fragments into
//! one configuration document.
//!
//! Everything in this crate is pure and synchronous. Talking to the external
//! text-generation capability, and scheduling those calls, happens in the
//! `lintgen-llm` and `lintgen-pipeline` crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod builder;
mod emit;
mod parser;
mod types;

pub use aggregate::{aggregate, AggregateError, AggregatedConfig, EntryMember, RuleEntry};
pub use builder::build_fragment;
pub use emit::render;
pub use parser::parse_rules;
pub use types::{
    ConfigFragment, DocExample, FlagDescriptor, FlagKind, FragmentId, RefinedRule, Rule, RuleId,
    RuleStatus, RunSummary, Severity, TemplateArgs, TemplateFamily,
};
