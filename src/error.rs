use std::path::PathBuf;
use thiserror::Error;

/// Failure while persisting preferences.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to write preferences at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error for the binary. Only terminal setup can fail; config and
/// persistence problems are logged and the timer keeps running.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
