//! Domain errors raised by the cleaning pipeline.
//!
//! I/O and CLI glue report failures through `anyhow` with context; the
//! conditions below are the ones callers may want to match on.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// Two source columns normalize to the same label and the active policy forbids it.
    #[error("Columns '{first}' and '{second}' both normalize to '{label}'")]
    ColumnCollision {
        label: String,
        first: String,
        second: String,
    },

    /// Columns handed to a table do not share a row count.
    #[error("Column '{column}' has {actual} row(s) but the table has {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
