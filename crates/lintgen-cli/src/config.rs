//! Configuration file (`lintgen.toml`) types.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use lintgen_llm::Settings;
use lintgen_pipeline::PipelineOptions;

/// Top-level configuration for lintgen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Capability connection settings.
    #[serde(default)]
    pub capability: CapabilityConfig,

    /// Pipeline tuning.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Builds capability settings, with the API key supplied by the caller.
    #[must_use]
    pub fn settings(&self, api_key: String) -> Settings {
        Settings {
            provider: self.capability.provider.clone(),
            model: self.capability.model.clone(),
            api_key,
        }
    }

    /// Builds pipeline options.
    #[must_use]
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            max_concurrency: self.pipeline.max_concurrency,
            filter_timeout: Duration::from_secs(self.pipeline.filter_timeout_secs),
            refine_timeout: Duration::from_secs(self.pipeline.refine_timeout_secs),
            extract_timeout: Duration::from_secs(self.pipeline.extract_timeout_secs),
            overall_deadline: self.pipeline.overall_deadline_secs.map(Duration::from_secs),
        }
    }
}

/// `[capability]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityConfig {
    /// Provider name.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
        }
    }
}

/// `[pipeline]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum in-flight extraction requests.
    #[serde(default = "default_concurrency")]
    pub max_concurrency: usize,

    /// Per-call classification deadline in seconds.
    #[serde(default = "default_long_timeout")]
    pub filter_timeout_secs: u64,

    /// Per-call refinement deadline in seconds.
    #[serde(default = "default_long_timeout")]
    pub refine_timeout_secs: u64,

    /// Per-call extraction deadline in seconds.
    #[serde(default = "default_extract_timeout")]
    pub extract_timeout_secs: u64,

    /// Optional overall extraction deadline in seconds.
    #[serde(default)]
    pub overall_deadline_secs: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_concurrency(),
            filter_timeout_secs: default_long_timeout(),
            refine_timeout_secs: default_long_timeout(),
            extract_timeout_secs: default_extract_timeout(),
            overall_deadline_secs: None,
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_concurrency() -> usize {
    8
}

fn default_long_timeout() -> u64 {
    60
}

fn default_extract_timeout() -> u64 {
    45
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_stage_defaults() {
        let config = Config::default();
        assert_eq!(config.capability.provider, "openai");
        let options = config.pipeline_options();
        assert_eq!(options.max_concurrency, 8);
        assert_eq!(options.extract_timeout, Duration::from_secs(45));
        assert_eq!(options.overall_deadline, None);
    }

    #[test]
    fn parse_overrides_selected_fields() {
        let toml = r#"
[capability]
provider = "anthropic"
model = "claude-sonnet-4-20250514"

[pipeline]
max_concurrency = 4
overall_deadline_secs = 300
"#;
        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.capability.provider, "anthropic");
        let options = config.pipeline_options();
        assert_eq!(options.max_concurrency, 4);
        assert_eq!(options.overall_deadline, Some(Duration::from_secs(300)));
        // Untouched fields keep their defaults.
        assert_eq!(options.filter_timeout, Duration::from_secs(60));
    }

    #[test]
    fn settings_carry_the_supplied_api_key() {
        let settings = Config::default().settings("sk-test".to_string());
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.model, "gpt-4o");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::parse("[capability\nprovider = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
