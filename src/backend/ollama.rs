//! Ollama `/api/generate` client (non-streaming)

use super::TextBackend;
use crate::config::OllamaConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::trace;

const PROVIDER: &str = "ollama";

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}

pub struct OllamaBackend {
    config: OllamaConfig,
    client: Client,
    url: String,
}

impl OllamaBackend {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::backend(PROVIDER, e))?;
        let url = format!("{}/api/generate", config.base_url.trim_end_matches('/'));

        Ok(Self {
            config,
            client,
            url,
        })
    }
}

#[async_trait]
impl TextBackend for OllamaBackend {
    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        trace!(url = %self.url, model = %self.config.model, "Sending generate request");

        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::backend(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::backend(PROVIDER, format!("HTTP {status}")));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::backend(PROVIDER, e))?;

        Ok(body.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_non_streaming() {
        let json = serde_json::to_value(GenerateRequest {
            model: "llama3.1:latest",
            prompt: "p",
            stream: false,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"model": "llama3.1:latest", "prompt": "p", "stream": false}));
    }

    #[test]
    fn test_url_joins_base() {
        let backend = OllamaBackend::new(OllamaConfig::default()).unwrap();
        assert_eq!(backend.url, "http://localhost:11434/api/generate");
    }
}
