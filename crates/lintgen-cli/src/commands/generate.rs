//! Generate command implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use lintgen_core::RuleStatus;
use lintgen_llm::LlmClient;
use lintgen_pipeline::Pipeline;

use crate::config::Config;
use crate::config_resolver;

/// Arguments for the generate command.
pub struct GenerateArgs {
    /// Rules file to read.
    pub path: PathBuf,
    /// Output file override.
    pub out: Option<PathBuf>,
    /// Provider override.
    pub provider: Option<String>,
    /// Model override.
    pub model: Option<String>,
    /// API key for the capability provider.
    pub api_key: Option<String>,
    /// Extraction concurrency override.
    pub concurrency: Option<usize>,
    /// Overall extraction deadline override, in seconds.
    pub deadline: Option<u64>,
}

/// Runs the generate command.
///
/// Fatal pipeline errors (capability authorization, aggregation) propagate
/// and leave the output file untouched; per-rule failures are reported in
/// the summary and still exit successfully.
pub async fn run(args: GenerateArgs, explicit_config: Option<&Path>) -> Result<()> {
    let started = Instant::now();

    let project_dir = std::env::current_dir().context("Failed to resolve current directory")?;
    let source = config_resolver::resolve(&project_dir, explicit_config);
    let config = match source.path() {
        None => Config::default(),
        Some(p) => {
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p)
                .with_context(|| format!("Failed to load config: {}", p.display()))?
        }
    };

    let raw = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read rules file: {}", args.path.display()))?;

    let mut settings = config.settings(args.api_key.unwrap_or_default());
    if let Some(provider) = args.provider {
        settings.provider = provider;
    }
    if let Some(model) = args.model {
        settings.model = model;
    }

    let mut options = config.pipeline_options();
    if let Some(concurrency) = args.concurrency {
        options.max_concurrency = concurrency;
    }
    if let Some(deadline) = args.deadline {
        options.overall_deadline = Some(Duration::from_secs(deadline));
    }

    let out_path = args.out.unwrap_or_else(|| default_output_path(&args.path));
    tracing::info!("Target config path: {}", out_path.display());

    let capability = Arc::new(LlmClient::new(settings));
    let pipeline = Pipeline::new(capability, options);
    let report = pipeline.run(&raw).await.context("Pipeline run failed")?;

    std::fs::write(&out_path, &report.document)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    let filtered: Vec<_> = report
        .rules
        .iter()
        .filter(|r| matches!(r.status, RuleStatus::FilteredOut { .. }))
        .collect();
    if !filtered.is_empty() {
        println!("Filtered out as non-lintable:");
        for rule in filtered {
            println!("  - '{}'", rule.raw_text);
        }
        println!();
    }

    for failure in &report.failures {
        tracing::warn!("{} failed during {}: {}", failure.rule, failure.stage, failure.reason);
    }

    println!("{}", report.summary);
    println!("Wrote {}", out_path.display());
    println!("Completed in {:.2}s", started.elapsed().as_secs_f64());

    Ok(())
}

/// Default output location: the parent of the directory holding the rules
/// file, falling back to that directory itself at the filesystem root.
fn default_output_path(rules_path: &Path) -> PathBuf {
    let dir = match rules_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let target = match dir.parent() {
        Some(p) if p.as_os_str().is_empty() => PathBuf::from("."),
        Some(p) => p.to_path_buf(),
        None => dir,
    };
    target.join("eslint.config.mjs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_lands_in_the_parent_of_the_rules_dir() {
        assert_eq!(
            default_output_path(Path::new("project/rules/.cursorrules")),
            PathBuf::from("project/eslint.config.mjs")
        );
        assert_eq!(
            default_output_path(Path::new("rules/.cursorrules")),
            PathBuf::from("./eslint.config.mjs")
        );
    }

    #[test]
    fn bare_rules_file_writes_to_the_working_directory() {
        assert_eq!(
            default_output_path(Path::new(".cursorrules")),
            PathBuf::from("./eslint.config.mjs")
        );
    }

    #[test]
    fn filesystem_root_falls_back_to_itself() {
        assert_eq!(
            default_output_path(Path::new("/.cursorrules")),
            PathBuf::from("/eslint.config.mjs")
        );
    }
}
