//! Provider-backed capability client.

use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;

use crate::{parse, Capability, CapabilityError, Settings};

fn map_backend(provider: &str) -> Result<LLMBackend, CapabilityError> {
    match provider {
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "google" => Ok(LLMBackend::Google),
        "ollama" => Ok(LLMBackend::Ollama),
        "groq" => Ok(LLMBackend::Groq),
        "mistral" => Ok(LLMBackend::Mistral),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        other => Err(CapabilityError::UnknownProvider(other.to_string())),
    }
}

/// Classifies a provider-reported chat failure. Credential problems must
/// surface as [`CapabilityError::Auth`] so the pipeline aborts instead of
/// skipping rule after rule.
fn classify_failure(message: String) -> CapabilityError {
    let lower = message.to_lowercase();
    if lower.contains("401")
        || lower.contains("403")
        || lower.contains("unauthorized")
        || lower.contains("forbidden")
        || lower.contains("invalid api key")
        || lower.contains("authentication")
    {
        CapabilityError::Auth { message }
    } else {
        CapabilityError::Transport { message }
    }
}

/// [`Capability`] implementation on top of the `llm` crate's provider
/// backends.
#[derive(Debug, Clone)]
pub struct LlmClient {
    settings: Settings,
}

impl LlmClient {
    /// Creates a client for the given settings.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Capability for LlmClient {
    async fn request(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        response_schema: &schemars::Schema,
    ) -> Result<serde_json::Value, CapabilityError> {
        let backend = map_backend(&self.settings.provider)?;

        if self.settings.api_key.is_empty() && !matches!(backend, LLMBackend::Ollama) {
            return Err(CapabilityError::Auth {
                message: format!("no API key configured for provider {}", self.settings.provider),
            });
        }

        let schema_text = serde_json::to_string_pretty(response_schema)
            .map_err(|e| CapabilityError::Transport {
                message: format!("serialize response schema: {e}"),
            })?;
        let system = format!(
            "{system_prompt}\n\nRespond ONLY with a single JSON object conforming to this JSON \
             Schema, with no prose around it:\n{schema_text}"
        );

        let mut builder = LLMBuilder::new()
            .backend(backend)
            .model(&self.settings.model)
            .system(system.as_str());

        if !self.settings.api_key.is_empty() {
            builder = builder.api_key(&self.settings.api_key);
        }

        let provider = builder.build().map_err(|e| CapabilityError::Transport {
            message: format!("build LLM client: {e}"),
        })?;

        let messages = vec![ChatMessage::user().content(user_prompt).build()];

        let response = provider
            .chat(&messages)
            .await
            .map_err(|e| classify_failure(e.to_string()))?;

        let text = match response.text() {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(CapabilityError::EmptyResponse),
        };

        tracing::debug!(model = %self.settings.model, bytes = text.len(), "capability responded");

        let object = parse::extract_json_object(&text).ok_or(CapabilityError::MalformedJson)?;
        serde_json::from_str(&object).map_err(|_| CapabilityError::MalformedJson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_providers_map_to_backends() {
        for provider in ["openai", "anthropic", "google", "ollama", "groq", "mistral", "deepseek"]
        {
            assert!(map_backend(provider).is_ok(), "provider {provider}");
        }
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = map_backend("acme").unwrap_err();
        assert!(matches!(err, CapabilityError::UnknownProvider(p) if p == "acme"));
    }

    #[test]
    fn credential_failures_classify_as_auth() {
        assert!(matches!(
            classify_failure("HTTP 401 Unauthorized".into()),
            CapabilityError::Auth { .. }
        ));
        assert!(matches!(
            classify_failure("invalid api key provided".into()),
            CapabilityError::Auth { .. }
        ));
        assert!(matches!(
            classify_failure("connection reset by peer".into()),
            CapabilityError::Transport { .. }
        ));
    }
}
