//! Error handling for the CoalWatch engine
//!
//! The engine produces typed error values only; collaborators decide how
//! they map onto status codes or exit codes.

use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Engine error types
#[derive(Error, Debug)]
pub enum EngineError {
    /// Bad input shape or range, rejected before any data is touched
    #[error("Validation error: {0}")]
    Validation(String),

    /// Row-level ingestion failure, surfaced when a strict batch aborts
    #[error(transparent)]
    Row(#[from] RowError),

    /// Forecast requested over an empty history
    #[error("Insufficient data: the {0} history is empty")]
    InsufficientData(&'static str),

    /// Store read failure during an aggregation or rollup
    #[error("Aggregation failed: {0}")]
    Aggregation(#[source] StoreError),

    /// Store write failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// A failure tied to a single ingested row
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RowError {
    #[error("row {line}: missing value for column '{column}'")]
    MissingColumn { line: u64, column: &'static str },

    #[error("row {line}: unparseable date '{value}'")]
    BadDate { line: u64, value: String },

    #[error("row {line}: field '{field}' has unparseable value '{value}'")]
    BadField {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("row {line}: malformed CSV record: {message}")]
    Malformed { line: u64, message: String },
}

impl RowError {
    /// CSV line the failure occurred on (1-based, counting the header).
    pub fn line(&self) -> u64 {
        match self {
            RowError::MissingColumn { line, .. }
            | RowError::BadDate { line, .. }
            | RowError::BadField { line, .. }
            | RowError::Malformed { line, .. } => *line,
        }
    }
}
