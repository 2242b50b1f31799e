//! Error types for the fieldscope library.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for fieldscope operations.
#[derive(Debug, Error)]
pub enum FieldscopeError {
    /// An edit did not match the declared shape of the field.
    #[error("Invalid edit for '{key}': {}", .reasons.join("; "))]
    InvalidEdit { key: String, reasons: Vec<String> },

    /// An annotation is missing data required by its kind.
    #[error("Invalid annotation: {0}")]
    InvalidAnnotation(String),

    /// A rule table failed validation.
    #[error("Invalid rule table: {0}")]
    InvalidRuleTable(String),

    /// A version id that does not exist in the ledger.
    #[error("Unknown version: {0}")]
    UnknownVersion(String),

    /// An operation needs a selected field but none is selected.
    #[error("No field is selected for inspection")]
    NoSelection,

    /// The analyzer reported a failure.
    #[error("Analyzer error: {0}")]
    Analyzer(String),

    /// The analyzer did not answer in time.
    #[error("Analyzer timed out after {0:?}")]
    AnalyzerTimeout(Duration),

    /// The analysis task was cancelled before it finished.
    #[error("Analysis was cancelled")]
    AnalysisCancelled,

    /// Background analysis needs a Tokio runtime.
    #[error("No Tokio runtime available to run the analyzer")]
    NoRuntime,

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for fieldscope operations.
pub type Result<T> = std::result::Result<T, FieldscopeError>;
