//! Provider selection.
//!
//! A pure function of the configuration: one adapter is constructed for the
//! configured provider name, and misconfiguration (unknown name, missing
//! credential) fails here rather than on first use. The caller owns the
//! returned handle; sharing or rebuilding it per request scope is the
//! caller's decision.

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::gemini::GeminiProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;
use crate::provider::LlmProvider;

/// A provider could not be constructed from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ProviderConfigError {
    #[error("Unsupported LLM provider: {0}")]
    UnsupportedProvider(String),

    #[error("Missing required credential: {0}")]
    MissingCredential(&'static str),
}

/// Instantiate the configured provider adapter.
///
/// Provider names are matched case-insensitively.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, ProviderConfigError> {
    match config.provider.to_lowercase().as_str() {
        "ollama" => Ok(Arc::new(OllamaProvider::new(config.ollama.clone()))),
        "gemini" => Ok(Arc::new(GeminiProvider::new(config.gemini.clone())?)),
        "openai" => Ok(Arc::new(OpenAiProvider::new(config.openai.clone())?)),
        other => Err(ProviderConfigError::UnsupportedProvider(other.to_string())),
    }
}
