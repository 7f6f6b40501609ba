//! Crate error type

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid timestamp '{value}': expected ISO format (YYYY-MM-DDTHH:MM:SS)")]
    InvalidTimestamp { value: String },

    #[error("{provider} backend: {reason}")]
    Backend { provider: String, reason: String },

    #[error("failed to read answer from prompt: {0}")]
    Prompt(#[source] std::io::Error),
}

impl Error {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn backend(provider: impl Into<String>, reason: impl ToString) -> Self {
        Error::Backend {
            provider: provider.into(),
            reason: reason.to_string(),
        }
    }
}
