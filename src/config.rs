//! Runtime Configuration
//!
//! Everything is read once at startup from environment variables. Lookups go
//! through a closure so tests never touch the process environment.

use crate::error::{Error, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_PROVIDER: &str = "groq";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:latest";

/// Used when `LOG_START_DATE` is unset
pub const DEFAULT_START_DATE: &str = "2025-01-01T00:00:00";
/// Used when `LOG_END_DATE` is unset
pub const DEFAULT_END_DATE: &str = "2025-01-01T23:59:59";
/// Used when `LOG_START_DATE` is set but empty
pub const EMPTY_START_DATE: &str = "2023-01-01T00:00:00";

pub const DEFAULT_LOG_DIR: &str = "log";
pub const LOG_FILE_NAME: &str = "dummy_app.log";

// ============================================================================
// Backend selection
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GroqConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            model: DEFAULT_GROQ_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 80,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    Groq(GroqConfig),
    Ollama(OllamaConfig),
}

// ============================================================================
// Simulated time window
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    /// `None` runs until interrupted
    pub end: Option<NaiveDateTime>,
}

impl TimeWindow {
    /// Resolve raw env values into a window.
    ///
    /// `None` means the variable was unset; `Some("")` means it was set empty.
    /// Unparseable input falls back to `now - 1 day` with no end.
    pub fn resolve(start: Option<&str>, end: Option<&str>, now: NaiveDateTime) -> Self {
        let start_raw = match start {
            None => DEFAULT_START_DATE,
            Some("") => EMPTY_START_DATE,
            Some(s) => s,
        };
        let end_raw = end.unwrap_or(DEFAULT_END_DATE);

        let parsed = parse_timestamp(start_raw).and_then(|start| {
            let end = if end_raw.is_empty() {
                None
            } else {
                Some(parse_timestamp(end_raw)?)
            };
            Ok(TimeWindow { start, end })
        });

        match parsed {
            Ok(window) => {
                if let Some(end) = window.end.filter(|end| window.start >= *end) {
                    warn!(
                        start = %window.start,
                        end = %end,
                        "LOG_START_DATE is on or after LOG_END_DATE; generation may stop immediately"
                    );
                }
                window
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "Invalid LOG_START_DATE or LOG_END_DATE; falling back to 1 day ago with no end date"
                );
                TimeWindow {
                    start: now - TimeDelta::days(1),
                    end: None,
                }
            }
        }
    }
}

/// Parse an ISO-8601 timestamp, with or without fractional seconds or offset.
///
/// A bare date means midnight. An explicit offset is dropped after parsing,
/// keeping the wall-clock reading.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let s = raw.trim();

    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.naive_local());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::InvalidTimestamp {
            value: raw.to_string(),
        })
}

// ============================================================================
// Pacing
// ============================================================================

/// Real wall-clock delay between written lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl PacingConfig {
    pub const fn immediate() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(1500),
        }
    }
}

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone)]
pub struct Config {
    /// Lowercased `LLM_PROVIDER`, kept for messages even when no backend resolves
    pub provider: String,
    pub backend: Option<BackendConfig>,
    pub window: TimeWindow,
    pub log_dir: PathBuf,
    pub pacing: PacingConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = lookup("LLM_PROVIDER")
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string())
            .trim()
            .to_lowercase();

        let backend = match provider.as_str() {
            "groq" => match lookup("GROQ_API_KEY").filter(|k| !k.trim().is_empty()) {
                Some(api_key) => {
                    let mut cfg = GroqConfig::new(api_key);
                    if let Some(url) = lookup("GROQ_BASE_URL") {
                        cfg = cfg.with_base_url(url);
                    }
                    if let Some(model) = lookup("GROQ_MODEL") {
                        cfg = cfg.with_model(model);
                    }
                    Some(BackendConfig::Groq(cfg))
                }
                None => {
                    warn!(
                        "LLM_PROVIDER is 'groq' but GROQ_API_KEY is not set; log messages will be basic"
                    );
                    None
                }
            },
            "ollama" => {
                let mut cfg = OllamaConfig::default();
                if let Some(url) = lookup("OLLAMA_BASE_URL") {
                    cfg.base_url = url;
                }
                if let Some(model) = lookup("OLLAMA_MODEL") {
                    cfg.model = model;
                }
                Some(BackendConfig::Ollama(cfg))
            }
            other => {
                warn!(
                    provider = other,
                    "Unknown LLM_PROVIDER; set it to 'ollama' or 'groq'. Log messages will be basic"
                );
                None
            }
        };

        let window = TimeWindow::resolve(
            lookup("LOG_START_DATE").as_deref(),
            lookup("LOG_END_DATE").as_deref(),
            Local::now().naive_local(),
        );

        let log_dir = lookup("LOG_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        Self {
            provider,
            backend,
            window,
            log_dir,
            pacing: PacingConfig::default(),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }
}
