//! Core types for the rule-transformation pipeline.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identifier of a parsed rule, assigned in parse order.
///
/// All downstream work is tagged with this id so that output ordering can be
/// re-established after concurrent processing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RuleId(pub usize);

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rule#{}", self.0)
    }
}

/// Enforcement strength of a flagged pattern.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory; the linter reports but does not fail.
    Warn,
    /// Blocking; the linter fails the run.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Lifecycle status of a parsed rule. Set once by the filter stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    /// Not yet classified.
    Pending,
    /// Classified as not expressible as a lint check.
    FilteredOut {
        /// Why the rule was dropped (retained for the run summary and logs).
        reason: String,
    },
    /// Classified as expressible as a lint check.
    Lintable,
}

/// One natural-language line from the rules file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Parse-order identifier.
    pub id: RuleId,
    /// The candidate text as parsed (bullets and surrounding whitespace
    /// stripped).
    pub raw_text: String,
    /// Classification status.
    pub status: RuleStatus,
}

impl Rule {
    /// Creates a pending rule.
    #[must_use]
    pub fn new(id: RuleId, raw_text: impl Into<String>) -> Self {
        Self {
            id,
            raw_text: raw_text.into(),
            status: RuleStatus::Pending,
        }
    }

    /// Returns true if the filter classified this rule as lintable.
    #[must_use]
    pub fn is_lintable(&self) -> bool {
        self.status == RuleStatus::Lintable
    }
}

/// An atomic, directly-checkable restatement of a rule.
///
/// Refinement depth is capped at one by construction: there is no field for
/// nested refinement, and the refiner only consumes [`Rule`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinedRule {
    /// The rule this refinement came from.
    pub parent: RuleId,
    /// The simplified statement.
    pub text: String,
}

impl RefinedRule {
    /// Creates a refinement of `parent`.
    #[must_use]
    pub fn new(parent: RuleId, text: impl Into<String>) -> Self {
        Self {
            parent,
            text: text.into(),
        }
    }
}

/// Syntactic category of a flagged term.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    /// An identifier or language keyword (`fallback`, `var`, `Math.random`).
    Keyword,
    /// A specific string or number value (`"gpt-4o"`, `500`).
    Literal,
    /// A comparison or logical operator (`==`, `||`, `??`).
    Operator,
    /// A raw ESLint AST selector (`AssignmentPattern`).
    Selector,
}

/// Documentation accompanying a flag: how a violation looks and why it is
/// reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocExample {
    /// A short code snippet that violates the rule.
    pub violation_example: String,
    /// The message the linter should emit for that snippet.
    pub expected_error: String,
    /// Plain-language explanation of the restriction.
    pub explanation: String,
}

/// A structured descriptor extracted from one refined rule.
///
/// At most one descriptor exists per [`RefinedRule`]; extraction failures
/// leave none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDescriptor {
    /// Syntactic category of the flagged term.
    pub kind: FlagKind,
    /// The term itself.
    pub value: String,
    /// Free-text syntactic context reported by the capability.
    pub context: String,
    /// Enforcement strength.
    pub severity: Severity,
    /// Documentation triple, when the capability supplied one.
    pub docs: Option<DocExample>,
}

/// Identifier of a configuration fragment, unique within a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FragmentId(pub usize);

/// The fixed linter-rule template a fragment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateFamily {
    /// AST-selector based restrictions (`no-restricted-syntax`).
    RestrictedSyntax,
    /// Global-reference restrictions (`no-restricted-globals`).
    RestrictedGlobals,
    /// Property-access restrictions (`no-restricted-properties`).
    RestrictedProperties,
}

impl TemplateFamily {
    /// The ESLint rule name this family maps to.
    #[must_use]
    pub fn rule_name(self) -> &'static str {
        match self {
            Self::RestrictedSyntax => "no-restricted-syntax",
            Self::RestrictedGlobals => "no-restricted-globals",
            Self::RestrictedProperties => "no-restricted-properties",
        }
    }
}

impl std::fmt::Display for TemplateFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.rule_name())
    }
}

/// Arguments for one member of a rule-template entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateArgs {
    /// `no-restricted-syntax` option.
    Syntax {
        /// ESLint AST selector.
        selector: String,
        /// Message reported on match.
        message: String,
    },
    /// `no-restricted-globals` option.
    Global {
        /// Restricted global name.
        name: String,
        /// Message reported on match.
        message: String,
    },
    /// `no-restricted-properties` option.
    Property {
        /// Object whose property is restricted.
        object: String,
        /// Restricted property name.
        property: String,
        /// Message reported on match.
        message: String,
    },
}

impl TemplateArgs {
    /// The family these arguments belong to.
    #[must_use]
    pub fn family(&self) -> TemplateFamily {
        match self {
            Self::Syntax { .. } => TemplateFamily::RestrictedSyntax,
            Self::Global { .. } => TemplateFamily::RestrictedGlobals,
            Self::Property { .. } => TemplateFamily::RestrictedProperties,
        }
    }

    /// The deduplication key within an entry: the selector, global name, or
    /// `object.property` pair.
    #[must_use]
    pub fn target(&self) -> String {
        match self {
            Self::Syntax { selector, .. } => selector.clone(),
            Self::Global { name, .. } => name.clone(),
            Self::Property {
                object, property, ..
            } => format!("{object}.{property}"),
        }
    }

    /// The message carried by these arguments.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Syntax { message, .. }
            | Self::Global { message, .. }
            | Self::Property { message, .. } => message,
        }
    }

    /// Renders the arguments as an ESLint rule-entry option object.
    #[must_use]
    pub fn to_option_value(&self) -> serde_json::Value {
        match self {
            Self::Syntax { selector, message } => serde_json::json!({
                "selector": selector,
                "message": message,
            }),
            Self::Global { name, message } => serde_json::json!({
                "name": name,
                "message": message,
            }),
            Self::Property {
                object,
                property,
                message,
            } => serde_json::json!({
                "object": object,
                "property": property,
                "message": message,
            }),
        }
    }
}

/// One unit of generated linter configuration, traceable to exactly one
/// original rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFragment {
    /// Run-unique fragment identifier.
    pub id: FragmentId,
    /// The original rule this fragment traces back to.
    pub source_rule: RuleId,
    /// Template family the fragment belongs to.
    pub family: TemplateFamily,
    /// Template arguments.
    pub args: TemplateArgs,
    /// Enforcement strength of this fragment.
    pub severity: Severity,
    /// A code snippet that violates the rule.
    pub violation_example: String,
    /// The message the linter should emit for that snippet.
    pub expected_error: String,
    /// Plain-language explanation.
    pub explanation: String,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Rules parsed from the input file.
    pub total: usize,
    /// Rules classified as non-lintable (or unclassifiable).
    pub filtered_out: usize,
    /// Refined statements produced from lintable rules.
    pub refined: usize,
    /// Refined statements that yielded a flag descriptor.
    pub extracted: usize,
    /// Refined statements dropped by extraction failures or cancellation.
    pub failed: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rule(s) parsed, {} filtered out, {} refined, {} extracted, {} failed",
            self.total, self.filtered_out, self.refined, self.extracted, self.failed
        )
    }
}
