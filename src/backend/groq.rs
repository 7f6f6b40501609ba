//! Groq chat completions client (OpenAI-compatible wire format)

use super::TextBackend;
use crate::config::GroqConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::trace;

const PROVIDER: &str = "groq";

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

pub struct GroqBackend {
    config: GroqConfig,
    client: Client,
    url: String,
}

impl GroqBackend {
    pub fn new(config: GroqConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::backend(PROVIDER, e))?;
        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));

        Ok(Self {
            config,
            client,
            url,
        })
    }

    fn request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl TextBackend for GroqBackend {
    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        trace!(url = %self.url, model = %self.config.model, "Sending chat completion");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.config.api_key)
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(|e| Error::backend(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::backend(
                PROVIDER,
                format!("HTTP {status}: {}", body.chars().take(200).collect::<String>()),
            ));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::backend(PROVIDER, e))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::backend(PROVIDER, "response contained no completion"))
    }
}
