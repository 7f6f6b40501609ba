//! Text Backends
//!
//! Optional external text generation for the message part of a record:
//! - **groq**: OpenAI-compatible chat completions
//! - **ollama**: local `/api/generate`
//!
//! Callers go through [`MessageSource`], which never fails: a missing
//! backend or any backend error yields a fixed fallback message.

pub mod groq;
pub mod ollama;

use crate::config::BackendConfig;
use crate::error::Result;
use crate::record::{Level, SourceFile};
use async_trait::async_trait;
use tracing::{debug, info, warn};

pub use groq::GroqBackend;
pub use ollama::OllamaBackend;

/// Message used when no backend is configured
pub const FALLBACK_NOT_CONFIGURED: &str = "This is a sample log message (AI not configured/failed).";

/// Message used when a configured backend errors
pub fn fallback_on_error(provider: &str) -> String {
    format!("AI log generation failed with {provider}. (Using fallback message)")
}

/// Trait for text generation services
///
/// One request per record; no retries. Implementations return the raw
/// completion text and report every failure as an error.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Provider name used in log output and fallback messages
    fn provider(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build the prompt asking for a single log message at `level`.
pub fn build_prompt(level: Level, source: SourceFile) -> String {
    format!(
        "Generate a dummy log message for a Python application. \
         Return only the log message itself, with no reasoning, explanation or preamble. \
         The log level is '{level}' and the message is emitted from '{source}'. \
         It should read like a realistic single-line log message. \
         Examples: Error occurred while uploading file doc.zip. \
         OR Successfully connected to database at localhost:5432."
    )
}

/// Create the backend described by `config`.
pub fn from_config(config: &BackendConfig) -> Result<Box<dyn TextBackend>> {
    let backend: Box<dyn TextBackend> = match config {
        BackendConfig::Groq(cfg) => Box::new(GroqBackend::new(cfg.clone())?),
        BackendConfig::Ollama(cfg) => Box::new(OllamaBackend::new(cfg.clone())?),
    };
    Ok(backend)
}

/// Record message provider with the fallback policy applied
pub struct MessageSource {
    backend: Option<Box<dyn TextBackend>>,
}

impl MessageSource {
    pub fn new(backend: Option<Box<dyn TextBackend>>) -> Self {
        Self { backend }
    }

    /// No backend; every message is the static fallback.
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    /// Build from optional config. A client that fails to initialize is
    /// logged and treated as absent.
    pub fn from_config(config: Option<&BackendConfig>) -> Self {
        let backend = config.and_then(|cfg| match from_config(cfg) {
            Ok(backend) => {
                info!(provider = backend.provider(), "Using text backend for log messages");
                Some(backend)
            }
            Err(e) => {
                warn!(error = %e, "Could not initialize text backend; log messages will be basic");
                None
            }
        });
        Self { backend }
    }

    /// Always returns a non-empty message.
    pub async fn message(&self, level: Level, source: SourceFile) -> String {
        let Some(backend) = self.backend.as_deref() else {
            return FALLBACK_NOT_CONFIGURED.to_string();
        };

        let prompt = build_prompt(level, source);
        match backend.generate(&prompt).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    warn!(provider = backend.provider(), "Text backend returned an empty message");
                    fallback_on_error(backend.provider())
                } else {
                    debug!(provider = backend.provider(), len = text.len(), "Generated message");
                    // Keep one record per line
                    text.lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .collect::<Vec<_>>()
                        .join(" ")
                }
            }
            Err(e) => {
                warn!(provider = backend.provider(), error = %e, "Error calling text backend");
                fallback_on_error(backend.provider())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct Fixed(&'static str);

    #[async_trait]
    impl TextBackend for Fixed {
        fn provider(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl TextBackend for Failing {
        fn provider(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(Error::backend("failing", "connection refused"))
        }
    }

    #[tokio::test]
    async fn test_disabled_uses_static_fallback() {
        let source = MessageSource::disabled();
        assert_eq!(
            source.message(Level::Info, SourceFile::MainDelta).await,
            FALLBACK_NOT_CONFIGURED
        );
    }

    #[tokio::test]
    async fn test_backend_text_is_trimmed_and_single_line() {
        let source = MessageSource::new(Some(Box::new(Fixed("  Cache warmed.\n\n  42 keys loaded.  "))));
        assert_eq!(
            source.message(Level::Debug, SourceFile::UtilsGamma).await,
            "Cache warmed. 42 keys loaded."
        );
    }

    #[tokio::test]
    async fn test_backend_error_yields_provider_fallback() {
        let source = MessageSource::new(Some(Box::new(Failing)));
        assert_eq!(
            source.message(Level::Error, SourceFile::ServiceBeta).await,
            "AI log generation failed with failing. (Using fallback message)"
        );
    }

    #[tokio::test]
    async fn test_empty_completion_yields_fallback() {
        let source = MessageSource::new(Some(Box::new(Fixed("   "))));
        let msg = source.message(Level::Info, SourceFile::ModuleAlpha).await;
        assert_eq!(msg, fallback_on_error("fixed"));
    }

    #[test]
    fn test_prompt_mentions_level() {
        let prompt = build_prompt(Level::Critical, SourceFile::ModuleAlpha);
        assert!(prompt.contains("'CRITICAL'"));
        assert!(prompt.contains("module_alpha.py"));
    }
}
