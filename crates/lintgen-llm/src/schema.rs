//! Strict response contracts for each pipeline stage.
//!
//! Every capability response is deserialized into one of these DTOs
//! immediately on receipt; untyped JSON never crosses a component boundary.
//! The same types publish the JSON Schemas sent along with each request.

use lintgen_core::{DocExample, FlagDescriptor, FlagKind, Severity};
use schemars::{schema_for, JsonSchema, Schema};
use serde::Deserialize;

/// Filter-stage verdict for one candidate rule.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClassificationResponse {
    /// Whether the rule can be enforced by flagging concrete patterns.
    pub lintable: bool,
    /// Free-text reasoning. Retained for logs only.
    #[serde(default)]
    pub reasoning: String,
}

/// How the refiner handled a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RefinementOutcome {
    /// Already atomic; returned unchanged.
    PassedThrough,
    /// Broken down into simpler statements.
    Translated,
    /// Could not be reduced to concrete checkable terms.
    Untranslatable,
}

/// Refiner-stage result for one lintable rule.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RefinementResponse {
    /// Disposition of the rule.
    pub outcome: RefinementOutcome,
    /// Atomic restatements; empty for `untranslatable`.
    #[serde(default)]
    pub refined_rules: Vec<String>,
}

/// Extractor-stage flag descriptor for one refined rule.
///
/// `severity` and `kind` reuse the core enums, so values outside their
/// domains fail deserialization and count as schema violations.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FlagResponse {
    /// Syntactic category of the flagged term.
    pub kind: FlagKind,
    /// The term to flag.
    pub value: String,
    /// Syntactic context of the term.
    #[serde(default)]
    pub context: String,
    /// Enforcement strength.
    pub severity: Severity,
    /// Optional snippet that violates the rule.
    #[serde(default)]
    pub violation_example: Option<String>,
    /// Optional message the linter should emit.
    #[serde(default)]
    pub expected_error: Option<String>,
    /// Optional plain-language explanation.
    #[serde(default)]
    pub explanation: Option<String>,
}

impl From<FlagResponse> for FlagDescriptor {
    fn from(response: FlagResponse) -> Self {
        let docs = match (
            response.violation_example,
            response.expected_error,
            response.explanation,
        ) {
            (Some(violation_example), Some(expected_error), Some(explanation)) => {
                Some(DocExample {
                    violation_example,
                    expected_error,
                    explanation,
                })
            }
            _ => None,
        };

        Self {
            kind: response.kind,
            value: response.value,
            context: response.context,
            severity: response.severity,
            docs,
        }
    }
}

/// Schema sent with filter-stage requests.
#[must_use]
pub fn classification_schema() -> Schema {
    schema_for!(ClassificationResponse)
}

/// Schema sent with refiner-stage requests.
#[must_use]
pub fn refinement_schema() -> Schema {
    schema_for!(RefinementResponse)
}

/// Schema sent with extractor-stage requests.
#[must_use]
pub fn flag_schema() -> Schema {
    schema_for!(FlagResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_parses_with_and_without_reasoning() {
        let full: ClassificationResponse =
            serde_json::from_str(r#"{"lintable": true, "reasoning": "concrete operator"}"#)
                .expect("parse");
        assert!(full.lintable);
        let bare: ClassificationResponse =
            serde_json::from_str(r#"{"lintable": false}"#).expect("parse");
        assert!(bare.reasoning.is_empty());
    }

    #[test]
    fn refinement_outcomes_use_snake_case() {
        let response: RefinementResponse = serde_json::from_str(
            r#"{"outcome": "passed_through", "refined_rules": ["Use === instead of =="]}"#,
        )
        .expect("parse");
        assert_eq!(response.outcome, RefinementOutcome::PassedThrough);
        assert_eq!(response.refined_rules.len(), 1);
    }

    #[test]
    fn flag_response_rejects_out_of_domain_severity() {
        let raw = r#"{"kind": "operator", "value": "==", "severity": "fatal"}"#;
        assert!(serde_json::from_str::<FlagResponse>(raw).is_err());
    }

    #[test]
    fn flag_response_rejects_unknown_kind() {
        let raw = r#"{"kind": "regex", "value": "x", "severity": "warn"}"#;
        assert!(serde_json::from_str::<FlagResponse>(raw).is_err());
    }

    #[test]
    fn descriptor_docs_require_all_three_fields() {
        let partial: FlagResponse = serde_json::from_str(
            r#"{"kind": "selector", "value": "AssignmentPattern", "severity": "error",
                "expected_error": "No default parameters allowed!"}"#,
        )
        .expect("parse");
        let descriptor = FlagDescriptor::from(partial);
        assert!(descriptor.docs.is_none());

        let complete: FlagResponse = serde_json::from_str(
            r#"{"kind": "selector", "value": "AssignmentPattern", "severity": "error",
                "violation_example": "function foo(x = 0) {}",
                "expected_error": "No default parameters allowed!",
                "explanation": "Default parameters are banned."}"#,
        )
        .expect("parse");
        let descriptor = FlagDescriptor::from(complete);
        let docs = descriptor.docs.expect("docs");
        assert_eq!(docs.violation_example, "function foo(x = 0) {}");
    }

    #[test]
    fn published_schemas_name_their_enums() {
        let schema = serde_json::to_value(flag_schema()).expect("schema json");
        let text = schema.to_string();
        assert!(text.contains("selector"));
        assert!(text.contains("warn"));
        assert!(text.contains("error"));
    }
}
