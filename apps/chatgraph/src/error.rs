//! # Application Errors
//!
//! Everything a command can fail with. Core and client errors pass through
//! unchanged; `main` logs the result and exits non-zero.

use crate::client::ClientError;
use chatgraph_core::ChatGraphError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] ChatGraphError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Config error in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Cannot access '{}': {source}", path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("File size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Message not found: {0}")]
    MessageNotFound(String),

    #[error("Summary cancelled")]
    Cancelled,

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}
