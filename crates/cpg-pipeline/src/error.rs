//! Pipeline error types
//!
//! Every failure is fatal to a pipeline run: nothing is zero-filled and no
//! partial output escapes.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failures while reading and coercing the sales sheet
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{column}' (found: {found:?})")]
    MissingColumn { column: &'static str, found: Vec<String> },

    #[error("Type mismatch at line {line}, column '{column}': expected {expected}, found '{value}'")]
    TypeMismatch {
        line: u64,
        column: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("Value out of range at line {line}, column '{column}': {value} ({reason})")]
    OutOfRange {
        line: u64,
        column: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Invalid delimiter {0:?}: must be a single ASCII character")]
    InvalidDelimiter(char),
}

/// Failures while reducing a record set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Dataset is empty: cannot compute {output}")]
    EmptyDataset { output: &'static str },

    #[error("Integer overflow while computing {output} for '{key}'")]
    Overflow { output: &'static str, key: String },
}

/// Any failure of a load-then-aggregate run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to load sales data: {0}")]
    Load(#[from] LoadError),

    #[error("Failed to aggregate sales data: {0}")]
    Aggregate(#[from] AggregateError),
}

impl PipelineError {
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, PipelineError::Load(LoadError::TypeMismatch { .. }))
    }

    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, PipelineError::Aggregate(AggregateError::EmptyDataset { .. }))
    }
}
