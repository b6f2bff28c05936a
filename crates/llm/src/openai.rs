//! Adapter for the hosted OpenAI API.
//!
//! Wire format: `POST {base}/v1/chat/completions` with a bearer key. The
//! backend is chat-native, so `generate_text` wraps the prompt as a single
//! user message.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::OpenAiConfig;
use crate::error::LlmError;
use crate::factory::ProviderConfigError;
use crate::provider::{
    clamp_max_tokens, clamp_temperature, merge_extra, validate_chat_messages, ChatMessage,
    GenerationParams, LlmProvider,
};

/// Maximum output length requested from the backend.
pub const MAX_OUTPUT_TOKENS: i32 = 4096;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiProvider {
    /// Construct the adapter. A missing API key is a configuration error
    /// raised here, not at first call.
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderConfigError> {
        let api_key = config
            .api_key
            .ok_or(ProviderConfigError::MissingCredential("OPENAI_API_KEY"))?;

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

    /// Build the request body: clamped sampling parameters with the caller's
    /// extras merged on top at the body level (last wins).
    fn payload(&self, messages: &[ChatMessage], params: &GenerationParams) -> Value {
        let mut body = serde_json::Map::new();
        body.insert("model".to_string(), json!(self.model));
        body.insert("messages".to_string(), json!(messages));
        body.insert(
            "temperature".to_string(),
            json!(clamp_temperature(params.temperature)),
        );
        body.insert(
            "max_tokens".to_string(),
            json!(clamp_max_tokens(params.max_tokens, Some(MAX_OUTPUT_TOKENS))),
        );
        merge_extra(&mut body, &params.extra);
        Value::Object(body)
    }

    async fn post(&self, payload: &Value) -> Result<Value, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| LlmError::from_transport("OpenAI", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LlmError::Backend(format!(
                "OpenAI returned {status}: {body}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LlmError::Backend(format!("OpenAI returned a malformed payload: {e}")))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate_text(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let messages = [ChatMessage::user(prompt)];
        let response = self.post(&self.payload(&messages, params)).await?;
        Ok(extract_text(&response))
    }

    async fn generate_chat(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        validate_chat_messages(messages)?;
        let response = self.post(&self.payload(messages, params)).await?;
        Ok(extract_text(&response))
    }
}

/// Normalize a chat-completions response to plain text.
///
/// Order of preference: the first choice's `message.content`, then a legacy
/// `text` field on the choice, then the empty string.
fn extract_text(response: &Value) -> String {
    let Some(choice) = response
        .get("choices")
        .and_then(|choices| choices.get(0))
    else {
        return String::new();
    };

    if let Some(content) = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
    {
        return content.to_string();
    }

    choice
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}
