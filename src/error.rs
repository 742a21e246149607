//! Error types for predecir
//!
//! Clear error messages with actionable guidance: every variant names the
//! failing stage (connection, query, schema, fit, evaluation) so a one-shot
//! pipeline run terminates with a diagnostic that points at the input to fix.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Predecir error types
#[derive(Error, Debug)]
pub enum Error {
    /// Connection string is malformed or missing required fields
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query parsing error
    #[error("SQL parse error: {0}")]
    Parse(String),

    /// Query execution error (unknown table, unknown column)
    #[error("Query error: {0}")]
    Query(String),

    /// Imported data does not match the declared column schema
    #[error("Schema error: {0}")]
    Schema(String),

    /// Storage error (Parquet/Arrow table loading)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Pipeline configuration is invalid
    #[error("Config error: {0}")]
    Config(String),

    /// Model fitting failed
    #[error("Fit error: {0}")]
    Fit(String),

    /// Evaluation failed (prediction/ground-truth mismatch)
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
