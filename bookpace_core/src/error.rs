//! Error types for the bookpace_core library.
//!
//! The estimator itself is total and never fails; this taxonomy serves the
//! surrounding store, log, export, and config layers.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bookpace_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Shelf store error (lookup failures, ambiguous titles)
    #[error("Shelf error: {0}")]
    Store(String),

    /// Book state error (invalid page, finished-book mutation)
    #[error("Book error: {0}")]
    Book(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
