//! Error types for benchtally.

use thiserror::Error;

/// Result type for benchtally operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for benchtally operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Result-file parsing error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Result-file discovery error.
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Report generation error.
    #[error("Report error: {0}")]
    Report(String),

    /// No usable result files were found; nothing can be reported.
    #[error("No result files found under {0}")]
    NoResults(String),
}

impl Error {
    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a discovery error.
    pub fn discovery(msg: impl Into<String>) -> Self {
        Error::Discovery(msg.into())
    }

    /// Create a report error.
    pub fn report(msg: impl Into<String>) -> Self {
        Error::Report(msg.into())
    }
}
