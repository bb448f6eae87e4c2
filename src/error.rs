// Error types for the analysis core
// Anything that aborts a run ends up here, with enough context to find the bad input

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    /// A supplied play record could not be turned into a `PlayEvent`.
    #[error("data error in record {index}: {message}")]
    Data { index: usize, message: String },

    /// Invalid configuration, rejected before any processing happens.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl StatsError {
    pub fn data(index: usize, message: impl Into<String>) -> Self {
        Self::Data {
            index,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
