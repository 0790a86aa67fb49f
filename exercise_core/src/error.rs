//! Errors surfaced by the catalog adapters, configuration and CLI boundary.
//!
//! Scoring and deduplication are total functions and never return these.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Catalog or report (de)serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Audit log
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied input that cannot be judged, such as a blank name
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The catalog file is unusable as a whole, or unsafe to rewrite
    #[error("Catalog error: {0}")]
    Catalog(String),
}
