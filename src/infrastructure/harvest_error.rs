//! Run-fatal errors
//!
//! Only failures that make a run meaningless live here: the document could
//! not be fetched, configuration is unusable, or the archive could not be
//! written. Everything found inside the document is a `Diagnostic`.

use crate::domain::RegistryError;
use crate::infrastructure::parsing_error::ParsingError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("HTTP request failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl HarvestError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch { source, .. } => source.is_timeout() || source.is_connect(),
            Self::HttpStatus { status, .. } => {
                matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}

pub type HarvestResult<T> = Result<T, HarvestError>;
