use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::LlmSettings;
use crate::error::ExtractError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".to_string(), content: content.into() }
    }
}

/// Assemble an ordered conversation: one system turn, then a user/assistant
/// pair per prior turn, then the current prompt as the final user turn.
pub fn build_chat(
    system_prompt: &str,
    history: &[(String, String)],
    prompt: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(ChatMessage::system(system_prompt));
    for (user_text, model_text) in history {
        messages.push(ChatMessage::user(user_text.clone()));
        messages.push(ChatMessage::assistant(model_text.clone()));
    }
    messages.push(ChatMessage::user(prompt));
    messages
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionChoice {
    message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ModelsResponse {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Backend seam for the extraction pipeline. Production code uses
/// [`OpenAiClient`]; tests substitute a stub.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ExtractError>;
}

/// Client for an OpenAI-compatible chat-completion endpoint.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    pub model: String,
    temperature: f32,
    max_tokens: u32,
    max_retries: u32,
    retry_backoff: Duration,
}

impl OpenAiClient {
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, ExtractError> {
        Self::new(
            settings.base_url.clone(),
            settings.resolve_api_key(),
            settings.model.clone(),
            settings.temperature,
            settings.max_tokens,
            settings.timeout,
            settings.max_retries,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        temperature: f32,
        max_tokens: u32,
        timeout: u64,
        max_retries: u32,
    ) -> Result<Self, ExtractError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        if let Some(key) = api_key {
            let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| ExtractError::Config(format!("invalid API key: {}", e)))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            temperature,
            max_tokens,
            max_retries,
            retry_backoff: Duration::from_secs(2),
        })
    }

    #[cfg(test)]
    fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Probe the models endpoint to verify the server is reachable.
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/v1/models", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    pub async fn list_models(&self) -> Result<Vec<String>, ExtractError> {
        let url = format!("{}/v1/models", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ExtractError::Backend(format!(
                "models endpoint returned {}",
                response.status()
            )));
        }

        let models: ModelsResponse = response.json().await?;
        Ok(models.data.into_iter().map(|m| m.id).collect())
    }

    async fn send_completion(&self, messages: &[ChatMessage]) -> Result<String, ExtractError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!("Sending chat completion request: model={}", self.model);

        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ExtractError::Backend(format!(
                "chat completion returned {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::Backend(format!("invalid completion payload: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ExtractError::Backend("no choices in completion".to_string()))?;

        Ok(choice.message.content)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ExtractError> {
        let mut attempt = 0;
        loop {
            match self.send_completion(messages).await {
                Ok(content) => return Ok(content),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    let backoff = self.retry_backoff * attempt;
                    warn!(
                        "Completion attempt {} failed ({}), retrying in {:?}",
                        attempt, e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
