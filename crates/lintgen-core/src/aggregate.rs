//! Deterministic aggregation of configuration fragments.
//!
//! Fragments are grouped by template family into array-valued rule entries,
//! ordered by the originating rule's parse position. Completion order of the
//! concurrent extraction stage must never be observable here: the input is
//! re-sorted by source rule before grouping.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{ConfigFragment, RuleId, Severity, TemplateArgs, TemplateFamily};

/// One member of a rule-template entry, still traceable to its source rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMember {
    /// Rule this member traces back to (first occurrence when deduplicated).
    pub source_rule: RuleId,
    /// Severity after the stricter-wins merge.
    pub severity: Severity,
    /// Template arguments.
    pub args: TemplateArgs,
}

/// An array-valued rule entry: one template family, many members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Template family of every member.
    pub family: TemplateFamily,
    /// Members in originating-rule order.
    pub members: Vec<EntryMember>,
}

/// The merged configuration document model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedConfig {
    /// Rule entries, ordered by each family's earliest originating rule.
    pub entries: Vec<RuleEntry>,
    /// `Error` if any fragment was an error, else `Warn` if any fragment
    /// existed, else `None` (no enforced rules).
    pub overall_severity: Option<Severity>,
    /// The fragments that survived aggregation, in originating-rule order.
    /// Kept for traceability and documentation output.
    pub fragments: Vec<ConfigFragment>,
}

/// Internal consistency failure while merging fragments. The one fatal
/// error class of the pipeline: a corrupted merge cannot be partially
/// trusted, so no output document may be written.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum AggregateError {
    /// Two fragments carried the same identifier.
    #[error("duplicate fragment id {id} (source {rule})")]
    #[diagnostic(
        code(lintgen::aggregate::duplicate_fragment),
        help("fragment ids must be unique within a run; this indicates a pipeline bug")
    )]
    DuplicateFragment {
        /// The repeated fragment id.
        id: usize,
        /// Source rule of the second occurrence.
        rule: RuleId,
    },

    /// A fragment's declared family disagrees with its template arguments.
    #[error("fragment {id} declares family {family} but carries {actual} arguments")]
    #[diagnostic(code(lintgen::aggregate::family_mismatch))]
    FamilyMismatch {
        /// Offending fragment id.
        id: usize,
        /// Declared family.
        family: TemplateFamily,
        /// Family implied by the arguments.
        actual: TemplateFamily,
    },

    /// A fragment has an empty selector or target name.
    #[error("fragment {id} ({family}) has an empty target")]
    #[diagnostic(code(lintgen::aggregate::empty_target))]
    EmptyTarget {
        /// Offending fragment id.
        id: usize,
        /// Family of the offending fragment.
        family: TemplateFamily,
    },
}

/// Merges fragments into one configuration document model.
///
/// Duplicate targets within a family collapse into a single member; when the
/// duplicates disagree on severity the stricter one wins, and the first
/// occurrence (by rule order) keeps its message.
///
/// # Errors
///
/// Returns [`AggregateError`] on internal inconsistency: duplicate fragment
/// ids, family/argument mismatch, or an empty target. These abort the run.
pub fn aggregate(mut fragments: Vec<ConfigFragment>) -> Result<AggregatedConfig, AggregateError> {
    // Re-establish input order; completion order must not leak through.
    fragments.sort_by_key(|f| (f.source_rule, f.id));

    let mut seen_ids = HashSet::new();
    for fragment in &fragments {
        if !seen_ids.insert(fragment.id) {
            return Err(AggregateError::DuplicateFragment {
                id: fragment.id.0,
                rule: fragment.source_rule,
            });
        }
        let actual = fragment.args.family();
        if actual != fragment.family {
            return Err(AggregateError::FamilyMismatch {
                id: fragment.id.0,
                family: fragment.family,
                actual,
            });
        }
        if fragment.args.target().trim().is_empty() {
            return Err(AggregateError::EmptyTarget {
                id: fragment.id.0,
                family: fragment.family,
            });
        }
    }

    let mut entries: Vec<RuleEntry> = Vec::new();
    for fragment in &fragments {
        let idx = match entries.iter().position(|e| e.family == fragment.family) {
            Some(idx) => idx,
            None => {
                entries.push(RuleEntry {
                    family: fragment.family,
                    members: Vec::new(),
                });
                entries.len() - 1
            }
        };
        let entry = &mut entries[idx];

        let target = fragment.args.target();
        match entry
            .members
            .iter_mut()
            .find(|m| m.args.target() == target)
        {
            Some(member) => {
                // Stricter wins; first occurrence keeps its message.
                member.severity = member.severity.max(fragment.severity);
                tracing::debug!(
                    "deduplicated repeated target '{}' within {}",
                    target,
                    fragment.family
                );
            }
            None => entry.members.push(EntryMember {
                source_rule: fragment.source_rule,
                severity: fragment.severity,
                args: fragment.args.clone(),
            }),
        }
    }

    let overall_severity = fragments.iter().map(|f| f.severity).max();

    Ok(AggregatedConfig {
        entries,
        overall_severity,
        fragments,
    })
}

impl AggregatedConfig {
    /// Total member count across all entries.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.entries.iter().map(|e| e.members.len()).sum()
    }
}
