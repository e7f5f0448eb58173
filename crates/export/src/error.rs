//! Error types for the export crate (thiserror-based).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("invalid export config: {0}")]
    InvalidConfig(String),

    #[error("capture sink error: {0}")]
    Sink(String),

    #[error("capture sink produced no data")]
    EmptyOutput,
}

/// Convenience Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
