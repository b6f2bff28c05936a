//! Provider configuration loaded from environment variables.
//!
//! The configuration is an explicit struct handed to
//! [`crate::factory::create_provider`] rather than global state, so tests and
//! alternative entrypoints can construct it directly.

/// Default Ollama read timeout in seconds. Generation is slow; the read
/// deadline is materially longer than connect/write.
const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 120;

/// Top-level LLM configuration: which provider to use plus the per-adapter
/// settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Provider name, matched case-insensitively by the factory
    /// (`"ollama"`, `"gemini"`, `"openai"`).
    pub provider: String,
    pub ollama: OllamaConfig,
    pub gemini: GeminiConfig,
    pub openai: OpenAiConfig,
}

/// Settings for the local Ollama runtime adapter.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base HTTP URL, e.g. `http://127.0.0.1:11434`. Trailing slash stripped.
    pub base_url: String,
    pub model: String,
    /// Read timeout in seconds for generation requests.
    pub request_timeout_secs: u64,
}

/// Settings for the hosted Gemini adapter.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Required credential; absence is a construction-time error.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

/// Settings for the hosted OpenAI adapter.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Required credential; absence is a construction-time error.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl LlmConfig {
    /// Load LLM configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                                        |
    /// |------------------------------|------------------------------------------------|
    /// | `LLM_PROVIDER`               | `ollama`                                       |
    /// | `OLLAMA_BASE_URL`            | `http://127.0.0.1:11434`                       |
    /// | `OLLAMA_MODEL`               | `llama3.2`                                     |
    /// | `OLLAMA_REQUEST_TIMEOUT_SECS`| `120`                                          |
    /// | `GEMINI_API_KEY`             | --                                             |
    /// | `GEMINI_MODEL`               | `gemini-pro`                                   |
    /// | `GEMINI_BASE_URL`            | `https://generativelanguage.googleapis.com`    |
    /// | `OPENAI_API_KEY`             | --                                             |
    /// | `OPENAI_MODEL`               | `gpt-4o-mini`                                  |
    /// | `OPENAI_BASE_URL`            | `https://api.openai.com`                       |
    pub fn from_env() -> Self {
        let provider = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "ollama".into());

        let ollama = OllamaConfig {
            base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:11434".into())
                .trim_end_matches('/')
                .to_string(),
            model: std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".into()),
            request_timeout_secs: std::env::var("OLLAMA_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_OLLAMA_TIMEOUT_SECS),
        };

        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-pro".into()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into())
                .trim_end_matches('/')
                .to_string(),
        };

        let openai = OpenAiConfig {
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".into())
                .trim_end_matches('/')
                .to_string(),
        };

        Self {
            provider,
            ollama,
            gemini,
            openai,
        }
    }
}
