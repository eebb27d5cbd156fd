//! Centralized error handling for datalens.
//!
//! The numeric scoring path is total and never produces these errors. They
//! surface only at the edges: reading input files, loading configuration, and
//! talking to the external language model.
//!
//! ```no_run
//! use datalens::error::{Result, ResultExt as _};
//!
//! fn read_raw(path: &str) -> Result<String> {
//!     let content = std::fs::read_to_string(path).context("Failed to read rows")?;
//!     Ok(content)
//! }
//! ```

use std::fmt;

/// Main error type for datalens operations.
#[derive(Debug)]
pub enum DatalensError {
    /// I/O errors (file operations)
    Io(std::io::Error),

    /// Input could not be decoded (malformed JSON and the like)
    Parse(String),

    /// Input decoded but violates the caller contract
    InvalidInput(String),

    /// Configuration errors
    Config(String),

    /// Language model request failed
    Ai(String),

    /// External call exceeded its time budget
    Timeout(u64),

    /// External call was cancelled by the caller
    Cancelled,

    /// Another error with a description of what was being attempted
    Context {
        message: String,
        source: Box<DatalensError>,
    },
}

impl fmt::Display for DatalensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse(msg) => write!(f, "Parse error: {msg}"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Ai(msg) => write!(f, "AI request error: {msg}"),
            Self::Timeout(secs) => write!(f, "Request timed out after {secs} seconds"),
            Self::Cancelled => write!(f, "Request cancelled"),
            Self::Context { message, source } => write!(f, "{message}: {source}"),
        }
    }
}

impl std::error::Error for DatalensError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Context { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DatalensError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for DatalensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(format!("JSON error: {err}"))
    }
}

/// Result type alias for datalens operations.
pub type Result<T> = std::result::Result<T, DatalensError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<DatalensError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| DatalensError::Context {
            message: msg.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| DatalensError::Context {
            message: f(),
            source: Box::new(e.into()),
        })
    }
}
