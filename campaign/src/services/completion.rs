//! HTTP client for the remote text-generation service
//!
//! OpenAI-compatible chat-completions call; non-2xx and timeouts are plain
//! failures for the reply engine to resolve against its fallback policy.

use std::time::Duration;

use shared::CompletionFailure;

use crate::traits::CompletionClient;

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Bound on the whole request; a slow completion is a failed completion.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct HttpCompletionClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl HttpCompletionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(DEFAULT_API_URL, DEFAULT_MODEL, api_key)
    }

    pub fn with_endpoint(
        api_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client with static configuration");
        Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, CompletionFailure> {
        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt }
            ],
            "temperature": temperature,
            "max_tokens": max_tokens
        });

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionFailure::Timeout
                } else {
                    CompletionFailure::NetworkError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return match response.status().as_u16() {
                401 => Err(CompletionFailure::AuthenticationFailed),
                429 => Err(CompletionFailure::RateLimitExceeded),
                503 => Err(CompletionFailure::ServiceUnavailable),
                _ => Err(CompletionFailure::ServerError(response.status().to_string())),
            };
        }

        let response_json: serde_json::Value = response.json().await.map_err(|e| {
            CompletionFailure::InvalidResponse(format!("Failed to parse response: {e}"))
        })?;

        let content = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| CompletionFailure::InvalidResponse("No content in response".to_string()))?;

        Ok(content.trim().to_string())
    }
}
