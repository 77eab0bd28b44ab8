//! Refiner stage: break lintable rules into atomic checkable statements.
//!
//! Runs sequentially on purpose: refinement logging reads much better when
//! sub-rules appear under their parent, and the heavy fan-out belongs to the
//! extraction stage.

use lintgen_core::{RefinedRule, Rule};
use lintgen_llm::schema::{refinement_schema, RefinementOutcome, RefinementResponse};
use lintgen_llm::{prompt, Capability};

use crate::{call, PipelineError, PipelineOptions, Stage, StageFailure};

/// Refines every lintable rule exactly once.
///
/// Degradations: a `passed_through` verdict with an empty list falls back to
/// the rule's own text; `translated` with an empty list degrades to
/// untranslatable; a failed call retains the rule as its own refinement.
pub(crate) async fn refine_rules(
    capability: &dyn Capability,
    rules: &[Rule],
    options: &PipelineOptions,
    failures: &mut Vec<StageFailure>,
) -> Result<Vec<RefinedRule>, PipelineError> {
    let schema = refinement_schema();
    let mut refined = Vec::new();

    for rule in rules.iter().filter(|r| r.is_lintable()) {
        let user = prompt::refine_user(&rule.raw_text);
        let outcome = call(
            capability,
            prompt::refine_system(),
            &user,
            &schema,
            options.refine_timeout,
        )
        .await;

        match outcome {
            Ok(value) => match serde_json::from_value::<RefinementResponse>(value) {
                Ok(response) => {
                    apply_response(rule, response, &mut refined);
                }
                Err(err) => {
                    tracing::warn!(rule = %rule.id, "malformed refinement response: {err}");
                    failures.push(StageFailure {
                        rule: rule.id,
                        stage: Stage::Refinement,
                        reason: format!("malformed response: {err}"),
                    });
                    refined.push(RefinedRule::new(rule.id, rule.raw_text.clone()));
                }
            },
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => {
                tracing::warn!(rule = %rule.id, "refinement call failed: {err}");
                failures.push(StageFailure {
                    rule: rule.id,
                    stage: Stage::Refinement,
                    reason: err.to_string(),
                });
                refined.push(RefinedRule::new(rule.id, rule.raw_text.clone()));
            }
        }
    }

    Ok(refined)
}

fn apply_response(rule: &Rule, response: RefinementResponse, refined: &mut Vec<RefinedRule>) {
    match response.outcome {
        RefinementOutcome::PassedThrough => {
            if response.refined_rules.is_empty() {
                refined.push(RefinedRule::new(rule.id, rule.raw_text.clone()));
            } else {
                for text in response.refined_rules {
                    refined.push(RefinedRule::new(rule.id, text));
                }
            }
        }
        RefinementOutcome::Translated => {
            if response.refined_rules.is_empty() {
                tracing::info!(rule = %rule.id, "translated to nothing; treating as untranslatable");
            } else {
                tracing::info!(
                    rule = %rule.id,
                    "'{}' translated into {} statement(s)",
                    rule.raw_text,
                    response.refined_rules.len()
                );
                for text in response.refined_rules {
                    tracing::debug!(rule = %rule.id, "  - {text}");
                    refined.push(RefinedRule::new(rule.id, text));
                }
            }
        }
        RefinementOutcome::Untranslatable => {
            tracing::info!(rule = %rule.id, "untranslatable: '{}'", rule.raw_text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintgen_core::RuleId;

    fn lintable_rule(text: &str) -> Rule {
        let mut rule = Rule::new(RuleId(0), text);
        rule.status = lintgen_core::RuleStatus::Lintable;
        rule
    }

    #[test]
    fn passed_through_with_empty_list_falls_back_to_rule_text() {
        let rule = lintable_rule("No console.log");
        let mut refined = Vec::new();
        apply_response(
            &rule,
            RefinementResponse {
                outcome: RefinementOutcome::PassedThrough,
                refined_rules: vec![],
            },
            &mut refined,
        );
        assert_eq!(refined.len(), 1);
        assert_eq!(refined[0].text, "No console.log");
        assert_eq!(refined[0].parent, RuleId(0));
    }

    #[test]
    fn translated_expands_into_tagged_refinements() {
        let rule = lintable_rule("WE DONT USE FALLBACKS. EVER.");
        let mut refined = Vec::new();
        apply_response(
            &rule,
            RefinementResponse {
                outcome: RefinementOutcome::Translated,
                refined_rules: vec![
                    "Disallow the '||' operator".into(),
                    "Disallow the '??' operator".into(),
                ],
            },
            &mut refined,
        );
        assert_eq!(refined.len(), 2);
        assert!(refined.iter().all(|r| r.parent == RuleId(0)));
    }

    #[test]
    fn untranslatable_and_empty_translated_yield_nothing() {
        let rule = lintable_rule("Tests should be easy to understand");
        let mut refined = Vec::new();
        apply_response(
            &rule,
            RefinementResponse {
                outcome: RefinementOutcome::Untranslatable,
                refined_rules: vec![],
            },
            &mut refined,
        );
        apply_response(
            &rule,
            RefinementResponse {
                outcome: RefinementOutcome::Translated,
                refined_rules: vec![],
            },
            &mut refined,
        );
        assert!(refined.is_empty());
    }
}
