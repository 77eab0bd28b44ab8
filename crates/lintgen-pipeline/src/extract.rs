//! FlagExtractor stage: structured descriptor extraction under a bounded
//! worker pool.
//!
//! Every task is tagged with its refined-rule index; results land in an
//! append-only, id-keyed collection and are re-sorted after the join, so
//! completion order can never leak into output order. A schema-violating
//! response is retried exactly once before the refined rule is dropped.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use lintgen_core::{FlagDescriptor, RefinedRule};
use lintgen_llm::schema::{flag_schema, FlagResponse};
use lintgen_llm::{prompt, Capability, CapabilityError};

use crate::{call, PipelineError, PipelineOptions, Stage, StageFailure};

/// What the extraction stage produced.
pub(crate) struct ExtractionOutcome {
    /// `(refined index, descriptor)` pairs, sorted by index.
    pub descriptors: Vec<(usize, FlagDescriptor)>,
    /// Refined rules dropped by failures or cancellation.
    pub failures: Vec<StageFailure>,
}

enum ExtractFailure {
    /// Non-fatal: the refined rule is dropped and recorded.
    Dropped { reason: String },
    /// Fatal: aborts the whole run.
    Fatal(CapabilityError),
}

type TaskResult = (usize, Result<FlagDescriptor, ExtractFailure>);

/// Extracts a flag descriptor for every refined rule.
pub(crate) async fn extract_flags(
    capability: Arc<dyn Capability>,
    refined: &[RefinedRule],
    options: &PipelineOptions,
) -> Result<ExtractionOutcome, PipelineError> {
    let schema = Arc::new(flag_schema());
    let semaphore = Arc::new(Semaphore::new(options.max_concurrency.max(1)));
    let mut tasks: JoinSet<TaskResult> = JoinSet::new();

    for (index, rule) in refined.iter().enumerate() {
        let capability = Arc::clone(&capability);
        let semaphore = Arc::clone(&semaphore);
        let schema = Arc::clone(&schema);
        let text = rule.text.clone();
        let timeout = options.extract_timeout;

        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return (
                        index,
                        Err(ExtractFailure::Dropped {
                            reason: "worker pool closed".to_string(),
                        }),
                    )
                }
            };
            (
                index,
                request_with_retry(&*capability, &text, &schema, timeout).await,
            )
        });
    }

    let mut state = DrainState {
        descriptors: Vec::with_capacity(refined.len()),
        failures: Vec::new(),
        pending: (0..refined.len()).collect(),
    };

    let drained = match options.overall_deadline {
        None => drain(&mut tasks, refined, &mut state).await,
        Some(limit) => {
            match tokio::time::timeout(limit, drain(&mut tasks, refined, &mut state)).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        "pipeline deadline elapsed; cancelling {} outstanding extraction(s)",
                        state.pending.len()
                    );
                    tasks.abort_all();
                    // Keep whatever finished before the abort landed.
                    while let Some(joined) = tasks.join_next().await {
                        if let Ok((index, result)) = joined {
                            if let Some(fatal) = state.record(refined, index, result) {
                                return Err(fatal.into());
                            }
                        }
                    }
                    state.abandon_pending(refined, "cancelled by pipeline deadline");
                    Ok(())
                }
            }
        }
    };

    if let Err(fatal) = drained {
        tasks.abort_all();
        return Err(fatal.into());
    }

    // A panicked task leaves its index pending without a recorded result.
    state.abandon_pending(refined, "extraction task aborted unexpectedly");

    state.descriptors.sort_by_key(|(index, _)| *index);
    Ok(ExtractionOutcome {
        descriptors: state.descriptors,
        failures: state.failures,
    })
}

struct DrainState {
    descriptors: Vec<(usize, FlagDescriptor)>,
    failures: Vec<StageFailure>,
    pending: HashSet<usize>,
}

impl DrainState {
    /// Records one task result; returns a fatal error to propagate, if any.
    fn record(
        &mut self,
        refined: &[RefinedRule],
        index: usize,
        result: Result<FlagDescriptor, ExtractFailure>,
    ) -> Option<CapabilityError> {
        self.pending.remove(&index);
        match result {
            Ok(descriptor) => {
                self.descriptors.push((index, descriptor));
                None
            }
            Err(ExtractFailure::Fatal(err)) => Some(err),
            Err(ExtractFailure::Dropped { reason }) => {
                tracing::warn!(
                    rule = %refined[index].parent,
                    "dropping refined statement '{}': {reason}",
                    refined[index].text
                );
                self.failures.push(StageFailure {
                    rule: refined[index].parent,
                    stage: Stage::Extraction,
                    reason,
                });
                None
            }
        }
    }

    fn abandon_pending(&mut self, refined: &[RefinedRule], reason: &str) {
        let mut abandoned: Vec<usize> = self.pending.drain().collect();
        abandoned.sort_unstable();
        for index in abandoned {
            self.failures.push(StageFailure {
                rule: refined[index].parent,
                stage: Stage::Extraction,
                reason: reason.to_string(),
            });
        }
    }
}

async fn drain(
    tasks: &mut JoinSet<TaskResult>,
    refined: &[RefinedRule],
    state: &mut DrainState,
) -> Result<(), CapabilityError> {
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => {
                if let Some(fatal) = state.record(refined, index, result) {
                    return Err(fatal);
                }
            }
            Err(err) => tracing::warn!("extraction task failed to join: {err}"),
        }
    }
    Ok(())
}

async fn request_with_retry(
    capability: &dyn Capability,
    text: &str,
    schema: &schemars::Schema,
    timeout: Duration,
) -> Result<FlagDescriptor, ExtractFailure> {
    let user = prompt::extract_user(text);
    let mut last_reason = String::new();

    for attempt in 1..=2u8 {
        match call(capability, prompt::extract_system(), &user, schema, timeout).await {
            Ok(value) => match serde_json::from_value::<FlagResponse>(value) {
                Ok(response) if !response.value.trim().is_empty() => {
                    return Ok(FlagDescriptor::from(response));
                }
                Ok(_) => last_reason = "schema violation: empty flag value".to_string(),
                Err(err) => last_reason = format!("schema violation: {err}"),
            },
            Err(err) if err.is_fatal() => return Err(ExtractFailure::Fatal(err)),
            Err(err) => last_reason = err.to_string(),
        }
        if attempt == 1 {
            tracing::debug!("retrying flag extraction once: {last_reason}");
        }
    }

    Err(ExtractFailure::Dropped {
        reason: format!("failed after retry: {last_reason}"),
    })
}
