//! # lintgen-llm
//!
//! The external text-generation capability boundary: a provider-agnostic
//! [`Capability`] trait, a client backed by the `llm` crate, prompt
//! construction, and strict response schemas.
//!
//! Every call through this boundary is independently fallible and
//! non-deterministic in latency; callers must not assume ordering between
//! concurrent calls.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod parse;
pub mod prompt;
pub mod schema;

pub use engine::LlmClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Connection settings for the capability, threaded explicitly through every
/// component call. Components never read ambient environment state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Provider name (`openai`, `anthropic`, `google`, `ollama`, `groq`,
    /// `mistral`, `deepseek`).
    pub provider: String,
    /// Model identifier understood by the provider.
    pub model: String,
    /// API key; may be empty for local providers such as `ollama`.
    #[serde(default)]
    pub api_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            api_key: String::new(),
        }
    }
}

/// Failure modes of a capability call.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    /// Credential or authorization failure. Fatal: aborts the whole run.
    #[error("authorization rejected by provider: {message}")]
    Auth {
        /// Provider-reported reason.
        message: String,
    },

    /// The configured provider name is not supported. Fatal.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// The call did not complete within its deadline.
    #[error("capability call timed out after {seconds}s")]
    Timeout {
        /// The deadline that elapsed.
        seconds: u64,
    },

    /// Client construction or transport failure.
    #[error("capability transport failure: {message}")]
    Transport {
        /// Underlying failure text.
        message: String,
    },

    /// The capability returned no usable text.
    #[error("capability returned empty text")]
    EmptyResponse,

    /// No JSON object could be recovered from the capability output.
    #[error("no JSON object found in capability output")]
    MalformedJson,
}

impl CapabilityError {
    /// True for failures that can never succeed on retry and must abort the
    /// run before any output is written.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::UnknownProvider(_))
    }
}

/// The external text-generation capability.
///
/// Contract: `request(system_prompt, user_prompt, response_schema)` returns
/// structured JSON or a failure. Implementations must be safe to call
/// concurrently.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Issues one generation request and returns the structured JSON the
    /// capability produced.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] when the call fails or its output carries
    /// no JSON object. Schema conformance of the *content* is the caller's
    /// concern; this layer only guarantees syntactic JSON.
    async fn request(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        response_schema: &schemars::Schema,
    ) -> Result<serde_json::Value, CapabilityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_target_openai() {
        let settings = Settings::default();
        assert_eq!(settings.provider, "openai");
        assert_eq!(settings.model, "gpt-4o");
        assert!(settings.api_key.is_empty());
    }

    #[test]
    fn only_auth_and_unknown_provider_are_fatal() {
        assert!(CapabilityError::Auth {
            message: "bad key".into()
        }
        .is_fatal());
        assert!(CapabilityError::UnknownProvider("acme".into()).is_fatal());
        assert!(!CapabilityError::Timeout { seconds: 45 }.is_fatal());
        assert!(!CapabilityError::MalformedJson.is_fatal());
        assert!(!CapabilityError::EmptyResponse.is_fatal());
    }
}
