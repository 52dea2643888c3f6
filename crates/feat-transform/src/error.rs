//! Error types for stage execution.

use thiserror::Error;

/// A stage-fatal failure. Missing or unusable source columns are never
/// reported through this type; they are recorded as skips instead.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A Polars operation failed.
    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// The stage input could not be loaded.
    #[error(transparent)]
    Ingest(#[from] feat_ingest::IngestError),

    /// The stage output could not be persisted.
    #[error(transparent)]
    Output(#[from] feat_output::OutputError),

    /// A derived column does not line up with the frame.
    #[error("column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("age".into());
        let err: TransformError = polars_err.into();
        assert!(matches!(err, TransformError::Polars(_)));
    }

    #[test]
    fn test_length_mismatch_display() {
        let err = TransformError::LengthMismatch {
            column: "total_cost".to_string(),
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "column 'total_cost' has 2 values, expected 3"
        );
    }
}
