//! Adapter for a local Ollama runtime.
//!
//! Wire format: `POST {base}/api/generate` for single-turn and
//! `POST {base}/api/chat` for multi-turn, both with `stream: false` and an
//! `options` object carrying `temperature` and `num_predict`. Ollama supports
//! system/assistant roles natively, so chat histories are sent as-is.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::OllamaConfig;
use crate::error::LlmError;
use crate::provider::{
    clamp_max_tokens, clamp_temperature, merge_extra, validate_chat_messages, ChatMessage,
    GenerationParams, LlmProvider,
};

/// Connect and write deadline. Establishing the connection and sending the
/// payload are fast; only waiting for generation is slow.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(config: OllamaConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("reqwest client construction cannot fail with static options");

        Self {
            client,
            base_url: config.base_url,
            model: config.model,
        }
    }

    /// Build the `options` object: clamped sampling parameters, then the
    /// caller's extra options merged on top (last wins).
    fn build_options(&self, params: &GenerationParams) -> serde_json::Map<String, Value> {
        let mut options = serde_json::Map::new();
        options.insert(
            "temperature".to_string(),
            json!(clamp_temperature(params.temperature)),
        );
        options.insert(
            "num_predict".to_string(),
            json!(clamp_max_tokens(params.max_tokens, None)),
        );
        merge_extra(&mut options, &params.extra);
        options
    }

    fn generate_payload(&self, prompt: &str, params: &GenerationParams) -> Value {
        json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": self.build_options(params),
        })
    }

    fn chat_payload(&self, messages: &[ChatMessage], params: &GenerationParams) -> Value {
        json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
            "options": self.build_options(params),
        })
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<Value, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| LlmError::from_transport("Ollama", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LlmError::Backend(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LlmError::Backend(format!("Ollama returned a malformed payload: {e}")))
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate_text(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let payload = self.generate_payload(prompt, params);
        let response = self.post("/api/generate", &payload).await?;
        Ok(extract_generate_text(&response))
    }

    async fn generate_chat(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        validate_chat_messages(messages)?;
        let payload = self.chat_payload(messages, params);
        let response = self.post("/api/chat", &payload).await?;
        Ok(extract_chat_text(&response))
    }
}

/// `/api/generate` success shape: `{ "response": "..." }`. A missing field is
/// an empty result, not an error.
fn extract_generate_text(response: &Value) -> String {
    response
        .get("response")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

/// `/api/chat` success shape: `{ "message": { "content": "..." } }`, with
/// `.response` as a fallback for older runtimes.
fn extract_chat_text(response: &Value) -> String {
    if let Some(content) = response
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
    {
        return content.to_string();
    }
    extract_generate_text(response)
}
