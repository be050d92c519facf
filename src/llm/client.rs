//! LLM Client abstractions and provider management
//!
//! This module provides a unified interface for interacting with LLM providers:
//! - **Ollama**: Local LLM inference through the Ollama server
//! - **OpenAI**: The OpenAI chat completions API and compatible endpoints
//!   (for example Gemini's OpenAI-compatible surface)

use crate::types::{AppError, Result};
use crate::utils::toml_config::ProviderConfig;
use async_trait::async_trait;
use std::time::Duration;

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing for easy swapping
/// between providers without changing application code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Provider enum for runtime selection
#[derive(Debug, Clone, PartialEq)]
pub enum Provider {
    /// OpenAI API provider (including OpenAI-compatible APIs)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "sk-...".to_string(),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-4o-mini".to_string(),
    ///     timeout: Duration::from_secs(30),
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        timeout: Duration,
    },

    /// Ollama local LLM provider
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Ollama {
    ///     base_url: "http://localhost:11434".to_string(),
    ///     model: "llama3.2".to_string(),
    ///     timeout: Duration::from_secs(120),
    /// };
    /// ```
    Ollama {
        base_url: String,
        model: String,
        timeout: Duration,
    },
}

impl Provider {
    /// Build a provider from configuration, resolving the API key env var.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        match config {
            ProviderConfig::Ollama {
                base_url,
                model,
                timeout_secs,
            } => Ok(Provider::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
                timeout: Duration::from_secs(*timeout_secs),
            }),
            ProviderConfig::OpenAI {
                api_key_env,
                api_base,
                model,
                timeout_secs,
            } => {
                let api_key = std::env::var(api_key_env).map_err(|_| {
                    AppError::Configuration(format!(
                        "Environment variable '{}' for the OpenAI provider is not set",
                        api_key_env
                    ))
                })?;
                Ok(Provider::OpenAI {
                    api_key,
                    api_base: api_base.clone(),
                    model: model.clone(),
                    timeout: Duration::from_secs(*timeout_secs),
                })
            }
        }
    }

    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's feature is disabled or the client
    /// cannot be configured.
    pub async fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            #[cfg(feature = "openai")]
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                timeout,
            } => Ok(Box::new(super::openai::OpenAIClient::new(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                *timeout,
            )?)),

            #[cfg(feature = "ollama")]
            Provider::Ollama {
                base_url,
                model,
                timeout,
            } => Ok(Box::new(super::ollama::OllamaClient::new(
                base_url.clone(),
                model.clone(),
                *timeout,
            )?)),

            #[allow(unreachable_patterns)]
            other => Err(AppError::Configuration(format!(
                "{} provider support is not compiled in; enable the '{}' feature",
                other.name(),
                other.name().to_lowercase()
            ))),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    /// Model requested from this provider
    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } | Provider::Ollama { model, .. } => model,
        }
    }
}

/// Factory abstraction so agents can be handed a fresh client per turn and
/// tests can substitute a mock.
#[async_trait]
pub trait LLMClientFactoryTrait: Send + Sync {
    /// Get the default provider
    fn default_provider(&self) -> &Provider;

    /// Create a client using the default provider
    async fn create_default(&self) -> Result<Box<dyn LLMClient>>;
}

/// Configuration-based client factory
///
/// # Example
///
/// ```rust,ignore
/// use concierge::llm::{LLMClientFactory, Provider};
///
/// let factory = LLMClientFactory::new(Provider::Ollama {
///     base_url: "http://localhost:11434".to_string(),
///     model: "llama3.2".to_string(),
///     timeout: Duration::from_secs(120),
/// });
///
/// let client = factory.create_default().await?;
/// ```
pub struct LLMClientFactory {
    default_provider: Provider,
}

impl LLMClientFactory {
    /// Create a new factory with the specified default provider
    pub fn new(default_provider: Provider) -> Self {
        Self { default_provider }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Ok(Self::new(Provider::from_config(config)?))
    }
}

#[async_trait]
impl LLMClientFactoryTrait for LLMClientFactory {
    fn default_provider(&self) -> &Provider {
        &self.default_provider
    }

    async fn create_default(&self) -> Result<Box<dyn LLMClient>> {
        self.default_provider.create_client().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name() {
        let openai = Provider::OpenAI {
            api_key: "".to_string(),
            api_base: "".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(1),
        };
        assert_eq!(openai.name(), "OpenAI");
        assert_eq!(openai.model(), "gpt-4o-mini");

        let ollama = Provider::Ollama {
            base_url: "".to_string(),
            model: "llama3.2".to_string(),
            timeout: Duration::from_secs(1),
        };
        assert_eq!(ollama.name(), "Ollama");
    }

    #[test]
    fn test_from_config_ollama() {
        let provider = Provider::from_config(&ProviderConfig::default()).unwrap();
        assert_eq!(
            provider,
            Provider::Ollama {
                base_url: "http://localhost:11434".to_string(),
                model: "llama3.2".to_string(),
                timeout: Duration::from_secs(120),
            }
        );
    }

    #[test]
    fn test_from_config_openai_missing_key() {
        let config = ProviderConfig::OpenAI {
            api_key_env: "CONCIERGE_LLM_KEY_NEVER_SET".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
        };

        let err = Provider::from_config(&config).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains("CONCIERGE_LLM_KEY_NEVER_SET"));
    }

    #[test]
    fn test_factory_default_provider() {
        let factory = LLMClientFactory::new(Provider::Ollama {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            timeout: Duration::from_secs(120),
        });
        assert_eq!(factory.default_provider().name(), "Ollama");
    }
}
