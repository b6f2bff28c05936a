//! Adapter for the hosted Gemini API.
//!
//! Wire format: `POST {base}/v1beta/models/{model}:generateContent` with the
//! API key in the `x-goog-api-key` header. Gemini has no first-class system
//! role, so chat histories are translated: every turn becomes a `contents`
//! entry in order, `system` turns are demoted to user turns prefixed with
//! `"System: "`, and the final turn must come from the user.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::GeminiConfig;
use crate::error::LlmError;
use crate::factory::ProviderConfigError;
use crate::provider::{
    clamp_max_tokens, clamp_temperature, merge_extra, validate_chat_messages, ChatMessage,
    GenerationParams, LlmProvider, Role,
};

/// Maximum output length the backend accepts.
pub const MAX_OUTPUT_TOKENS: i32 = 8192;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    /// Construct the adapter. A missing API key is a configuration error
    /// raised here, not at first call.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderConfigError> {
        let api_key = config
            .api_key
            .ok_or(ProviderConfigError::MissingCredential("GEMINI_API_KEY"))?;

        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(READ_TIMEOUT)
            .build()
            .expect("reqwest client construction cannot fail with static options");

        Ok(Self {
            client,
            base_url: config.base_url,
            model: config.model,
            api_key,
        })
    }

    /// Build `generationConfig`: clamped sampling parameters with the
    /// caller's extras merged on top (last wins).
    fn generation_config(&self, params: &GenerationParams) -> serde_json::Map<String, Value> {
        let mut config = serde_json::Map::new();
        config.insert(
            "temperature".to_string(),
            json!(clamp_temperature(params.temperature)),
        );
        config.insert(
            "maxOutputTokens".to_string(),
            json!(clamp_max_tokens(params.max_tokens, Some(MAX_OUTPUT_TOKENS))),
        );
        merge_extra(&mut config, &params.extra);
        config
    }

    fn payload(&self, contents: Vec<Value>, params: &GenerationParams) -> Value {
        json!({
            "contents": contents,
            "generationConfig": self.generation_config(params),
        })
    }

    async fn post(&self, payload: &Value) -> Result<Value, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| LlmError::from_transport("Gemini", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LlmError::Backend(format!(
                "Gemini returned {status}: {body}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LlmError::Backend(format!("Gemini returned a malformed payload: {e}")))
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate_text(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let contents = vec![content_entry("user", prompt)];
        let response = self.post(&self.payload(contents, params)).await?;
        Ok(extract_text(&response))
    }

    async fn generate_chat(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let contents = translate_messages(messages)?;
        let response = self.post(&self.payload(contents, params)).await?;
        Ok(extract_text(&response))
    }
}

fn content_entry(role: &str, text: &str) -> Value {
    json!({ "role": role, "parts": [{ "text": text }] })
}

/// Translate a chat history into Gemini `contents` entries.
///
/// The final message must be a user turn; earlier turns are replayed in
/// order, with `system` demoted to a prefixed user turn and `assistant`
/// mapped to the backend's `model` role.
fn translate_messages(messages: &[ChatMessage]) -> Result<Vec<Value>, LlmError> {
    validate_chat_messages(messages)?;

    let contents = messages
        .iter()
        .map(|message| match message.role {
            Role::User => content_entry("user", &message.content),
            Role::System => content_entry("user", &format!("System: {}", message.content)),
            Role::Assistant => content_entry("model", &message.content),
        })
        .collect();

    Ok(contents)
}

/// Normalize a Gemini response to plain text.
///
/// Order of preference: a direct top-level `text` field, then the first
/// candidate's content parts concatenated, then the empty string. Missing
/// optional fields are never an error.
fn extract_text(response: &Value) -> String {
    if let Some(text) = response.get("text").and_then(Value::as_str) {
        return text.to_string();
    }

    if let Some(parts) = response
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
    {
        return parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("");
    }

    String::new()
}
