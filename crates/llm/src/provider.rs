//! The provider capability contract shared by all adapters.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of a chat-style message history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Generic generation parameters, translated by each adapter into its
/// backend's wire format.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    /// Output-length cap. Clamped to at least 1 and to the backend ceiling
    /// before transmission.
    pub max_tokens: i32,
    /// Sampling temperature. Clamped to `[0.0, 1.0]` before transmission.
    pub temperature: f64,
    /// Free-form backend parameters merged into the computed parameter
    /// object; on key collision the extra value wins.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.7,
            extra: serde_json::Map::new(),
        }
    }
}

impl GenerationParams {
    pub fn new(max_tokens: i32, temperature: f64) -> Self {
        Self {
            max_tokens,
            temperature,
            extra: serde_json::Map::new(),
        }
    }
}

/// Polymorphic generation capability. One implementation per backend.
///
/// Implementations make exactly one outbound network call per invocation and
/// wrap every transport or payload failure into [`LlmError`].
#[async_trait]
pub trait LlmProvider: std::fmt::Debug + Send + Sync {
    /// Stable adapter name for logging and diagnostics.
    fn name(&self) -> &'static str;

    /// Generate free text from a single prompt.
    async fn generate_text(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, LlmError>;

    /// Generate the next reply for a chat-style message history.
    ///
    /// The final message must have role [`Role::User`]; violating this fails
    /// with [`LlmError::InvalidInput`] before any network call.
    async fn generate_chat(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, LlmError>;
}

/// Clamp a sampling temperature into the `[0.0, 1.0]` range every backend
/// accepts.
pub fn clamp_temperature(temperature: f64) -> f64 {
    temperature.clamp(0.0, 1.0)
}

/// Clamp an output-length cap to at least 1 and, when the backend has one,
/// to its maximum supported output length.
pub fn clamp_max_tokens(max_tokens: i32, ceiling: Option<i32>) -> i32 {
    let floored = max_tokens.max(1);
    match ceiling {
        Some(limit) => floored.min(limit),
        None => floored,
    }
}

/// Validate the chat contract: a non-empty history ending in a user turn.
pub fn validate_chat_messages(messages: &[ChatMessage]) -> Result<(), LlmError> {
    let last = messages.last().ok_or_else(|| {
        LlmError::InvalidInput("Chat message history must not be empty.".to_string())
    })?;
    if last.role != Role::User {
        return Err(LlmError::InvalidInput(
            "Last chat message must be from the user.".to_string(),
        ));
    }
    Ok(())
}

/// Merge `extra` into `target`, overwriting on key collision (last wins).
pub fn merge_extra(
    target: &mut serde_json::Map<String, serde_json::Value>,
    extra: &serde_json::Map<String, serde_json::Value>,
) {
    for (key, value) in extra {
        target.insert(key.clone(), value.clone());
    }
}
