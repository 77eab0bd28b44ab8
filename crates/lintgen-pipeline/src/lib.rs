//! # lintgen-pipeline
//!
//! Orchestrates the rule-transformation stages: parse → filter → refine →
//! extract (bounded concurrency) → build → aggregate → render.
//!
//! Per-rule errors are isolated and recorded in a failure ledger; only two
//! error classes abort a run: capability authorization failures and
//! aggregation inconsistencies. Final output order is determined by original
//! parse order, never by call completion order.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extract;
mod filter;
mod refine;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use lintgen_core::{
    aggregate, build_fragment, parse_rules, render, AggregateError, AggregatedConfig, FragmentId,
    Rule, RuleId, RuleStatus, RunSummary,
};
use lintgen_llm::{Capability, CapabilityError};

/// Tuning knobs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Maximum in-flight flag-extraction requests.
    pub max_concurrency: usize,
    /// Per-call deadline for classification requests.
    pub filter_timeout: Duration,
    /// Per-call deadline for refinement requests.
    pub refine_timeout: Duration,
    /// Per-call deadline for extraction requests.
    pub extract_timeout: Duration,
    /// Overall deadline for the extraction stage. Outstanding calls are
    /// cancelled when it elapses; completed fragments still aggregate.
    pub overall_deadline: Option<Duration>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            filter_timeout: Duration::from_secs(60),
            refine_timeout: Duration::from_secs(60),
            extract_timeout: Duration::from_secs(45),
            overall_deadline: None,
        }
    }
}

/// The stage a recorded failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Lintable-or-not classification.
    Classification,
    /// Breaking rules into atomic statements.
    Refinement,
    /// Structured flag extraction.
    Extraction,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classification => write!(f, "classification"),
            Self::Refinement => write!(f, "refinement"),
            Self::Extraction => write!(f, "extraction"),
        }
    }
}

/// One isolated, non-fatal failure recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    /// The original rule the failing work belonged to.
    pub rule: RuleId,
    /// Stage that failed.
    pub stage: Stage,
    /// Human-readable reason.
    pub reason: String,
}

/// Fatal pipeline failure. Everything else is isolated per rule.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum PipelineError {
    /// The capability rejected our credentials or configuration.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// Aggregation detected an internal inconsistency.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Everything a completed run produced.
#[derive(Debug)]
pub struct PipelineReport {
    /// All parsed rules with their final statuses.
    pub rules: Vec<Rule>,
    /// The merged configuration model.
    pub config: AggregatedConfig,
    /// The rendered `eslint.config.mjs` text.
    pub document: String,
    /// Isolated failures, ordered by rule id.
    pub failures: Vec<StageFailure>,
    /// Run counts.
    pub summary: RunSummary,
}

/// The rule-transformation pipeline.
pub struct Pipeline {
    capability: Arc<dyn Capability>,
    options: PipelineOptions,
}

impl Pipeline {
    /// Creates a pipeline over the given capability.
    #[must_use]
    pub fn new(capability: Arc<dyn Capability>, options: PipelineOptions) -> Self {
        Self {
            capability,
            options,
        }
    }

    /// Runs the full pipeline over raw rules-file content.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] only for the fatal classes (capability
    /// authorization, aggregation inconsistency); per-rule failures are
    /// recorded in the report instead.
    pub async fn run(&self, input: &str) -> Result<PipelineReport, PipelineError> {
        let mut rules = parse_rules(input);
        tracing::info!("parsed {} candidate rule(s)", rules.len());

        let mut failures: Vec<StageFailure> = Vec::new();

        filter::classify_rules(&*self.capability, &mut rules, &self.options, &mut failures)
            .await?;
        let lintable = rules.iter().filter(|r| r.is_lintable()).count();
        tracing::info!("{lintable} of {} rule(s) classified lintable", rules.len());

        let refined =
            refine::refine_rules(&*self.capability, &rules, &self.options, &mut failures).await?;
        tracing::info!("{} refined statement(s) to extract flags from", refined.len());

        let extraction = extract::extract_flags(
            Arc::clone(&self.capability),
            &refined,
            &self.options,
        )
        .await?;
        failures.extend(extraction.failures);

        let mut fragments = Vec::with_capacity(extraction.descriptors.len());
        for (index, descriptor) in &extraction.descriptors {
            let source = &refined[*index];
            fragments.push(build_fragment(
                FragmentId(*index),
                source.parent,
                &source.text,
                descriptor,
            ));
        }

        let config = aggregate(fragments)?;
        let document = render(&config);

        let summary = RunSummary {
            total: rules.len(),
            filtered_out: rules
                .iter()
                .filter(|r| matches!(r.status, RuleStatus::FilteredOut { .. }))
                .count(),
            refined: refined.len(),
            extracted: extraction.descriptors.len(),
            failed: refined.len() - extraction.descriptors.len(),
        };

        failures.sort_by_key(|f| f.rule);

        Ok(PipelineReport {
            rules,
            config,
            document,
            failures,
            summary,
        })
    }
}

/// Wraps one capability call in its per-call deadline.
pub(crate) async fn call(
    capability: &dyn Capability,
    system_prompt: &str,
    user_prompt: &str,
    schema: &schemars::Schema,
    timeout: Duration,
) -> Result<serde_json::Value, CapabilityError> {
    match tokio::time::timeout(timeout, capability.request(system_prompt, user_prompt, schema))
        .await
    {
        Ok(result) => result,
        Err(_) => Err(CapabilityError::Timeout {
            seconds: timeout.as_secs(),
        }),
    }
}
