//! Uniform single-stage entry point.
//!
//! A stage can be fed either an in-memory table or a CSV path, and can
//! optionally persist its own output.

use std::path::{Path, PathBuf};

use feat_ingest::read_csv_table;
use feat_output::write_csv;
use polars::prelude::DataFrame;
use tracing::info;

use crate::error::Result;
use crate::stage::{Stage, StageContext, StageOutput};

/// Input accepted by [`process`].
#[derive(Debug, Clone)]
pub enum StageInput {
    Frame(DataFrame),
    Path(PathBuf),
}

impl StageInput {
    /// Resolve to a table, reading the CSV file if needed.
    pub fn load(self) -> Result<DataFrame> {
        match self {
            Self::Frame(df) => Ok(df),
            Self::Path(path) => Ok(read_csv_table(&path)?),
        }
    }
}

impl From<DataFrame> for StageInput {
    fn from(df: DataFrame) -> Self {
        Self::Frame(df)
    }
}

impl From<PathBuf> for StageInput {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for StageInput {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for StageInput {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

/// Run one stage over `input`, writing the result to `output` when given.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded, the stage fails, or the
/// output cannot be written.
pub fn process(
    stage: &dyn Stage,
    input: impl Into<StageInput>,
    ctx: &StageContext<'_>,
    output: Option<&Path>,
) -> Result<StageOutput> {
    let df = input.into().load()?;
    let mut result = stage.apply(&df, ctx)?;
    if let Some(path) = output {
        write_csv(&mut result.data, path)?;
        info!(stage = %stage.kind(), path = %path.display(), "stage output written");
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::ComputedColumns;
    use polars::prelude::Column;

    #[test]
    fn test_process_path_and_persist() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("orders.csv");
        std::fs::write(&input, "purchase_amount,shipping_cost\n100,10\n").unwrap();
        let output = dir.path().join("out").join("orders_step1_computed.csv");

        let result = process(
            &ComputedColumns,
            input.as_path(),
            &StageContext::system(),
            Some(&output),
        )
        .unwrap();

        assert_eq!(result.report.added, vec!["total_cost"]);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("purchase_amount,shipping_cost,total_cost"));
    }

    #[test]
    fn test_process_frame_without_output() {
        let df = DataFrame::new(vec![Column::new("age".into(), vec![4i64])]).unwrap();

        let result = process(&ComputedColumns, df, &StageContext::system(), None).unwrap();

        assert_eq!(result.data.width(), 2);
    }

    #[test]
    fn test_process_missing_file_is_error() {
        let result = process(
            &ComputedColumns,
            "does/not/exist.csv",
            &StageContext::system(),
            None,
        );
        assert!(result.is_err());
    }
}
