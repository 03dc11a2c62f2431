//! Error types for the telegram-chat-stats library.
//!
//! This module provides custom error types using `thiserror`. Only a malformed
//! top-level export shape is exceptional during analysis; per-record problems are
//! absorbed by the resolvers and never surface here.

use thiserror::Error;

/// Errors that can occur while loading, analysing or reporting on an export.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The document lacks `chats.list` or has an incompatible top-level shape
    #[error("Invalid Telegram export format")]
    InvalidFormat,

    /// The input text is not valid JSON, or a report could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV report errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Rejected caller input (paths, page sizes, unknown formats)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

impl AnalyzerError {
    /// Short machine-friendly label, used as a metrics dimension
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "invalid_format",
            Self::Json(_) => "json",
            Self::Io(_) => "io",
            Self::Csv(_) => "csv",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for Result with `AnalyzerError`
pub type Result<T> = std::result::Result<T, AnalyzerError>;

impl From<anyhow::Error> for AnalyzerError {
    fn from(err: anyhow::Error) -> Self {
        AnalyzerError::Other(err.to_string())
    }
}

impl From<config::ConfigError> for AnalyzerError {
    fn from(err: config::ConfigError) -> Self {
        AnalyzerError::InvalidConfig(err.to_string())
    }
}
