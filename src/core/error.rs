use std::path::PathBuf;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Provider configuration error: {0}")]
    ProviderConfiguration(String),

    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error: {message}: {source}")]
    Network {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("API error{}: {message}", .status_code.map(|c| format!(" ({c})")).unwrap_or_default())]
    Api {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Parse error: {message}: {source}")]
    Parse {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Console I/O error: {0}")]
    Console(#[source] std::io::Error),

    /// The prompt or the response was stopped by the provider's safety filters.
    #[error("Response blocked: {0}")]
    Blocked(String),
}

impl LlmError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LlmError::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status code returned by the API, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }
}
