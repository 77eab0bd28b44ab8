//! Filter stage: lintable-or-not classification, one request per rule.

use lintgen_core::{Rule, RuleStatus};
use lintgen_llm::schema::{classification_schema, ClassificationResponse};
use lintgen_llm::{prompt, Capability};

use crate::{call, PipelineError, PipelineOptions, Stage, StageFailure};

/// Classifies every pending rule in place.
///
/// Capability failures and malformed verdicts mark the rule
/// `filtered_out` with reason `classification_failed` and never abort the
/// run; only fatal capability errors propagate.
pub(crate) async fn classify_rules(
    capability: &dyn Capability,
    rules: &mut [Rule],
    options: &PipelineOptions,
    failures: &mut Vec<StageFailure>,
) -> Result<(), PipelineError> {
    let schema = classification_schema();

    for rule in rules.iter_mut() {
        let user = prompt::classify_user(&rule.raw_text);
        let outcome = call(
            capability,
            prompt::classify_system(),
            &user,
            &schema,
            options.filter_timeout,
        )
        .await;

        match outcome {
            Ok(value) => match serde_json::from_value::<ClassificationResponse>(value) {
                Ok(verdict) => {
                    if verdict.lintable {
                        rule.status = RuleStatus::Lintable;
                        tracing::debug!(rule = %rule.id, reasoning = %verdict.reasoning, "lintable");
                    } else {
                        tracing::info!(
                            rule = %rule.id,
                            reasoning = %verdict.reasoning,
                            "filtered out: '{}'",
                            rule.raw_text
                        );
                        rule.status = RuleStatus::FilteredOut {
                            reason: "non_lintable".to_string(),
                        };
                    }
                }
                Err(err) => {
                    tracing::warn!(rule = %rule.id, "malformed classification verdict: {err}");
                    rule.status = RuleStatus::FilteredOut {
                        reason: "classification_failed".to_string(),
                    };
                    failures.push(StageFailure {
                        rule: rule.id,
                        stage: Stage::Classification,
                        reason: format!("malformed verdict: {err}"),
                    });
                }
            },
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => {
                tracing::warn!(rule = %rule.id, "classification call failed: {err}");
                rule.status = RuleStatus::FilteredOut {
                    reason: "classification_failed".to_string(),
                };
                failures.push(StageFailure {
                    rule: rule.id,
                    stage: Stage::Classification,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(())
}
