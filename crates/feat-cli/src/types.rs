use std::path::PathBuf;
use std::time::Duration;

use feat_model::StageKind;

/// Outcome of one `run` invocation.
#[derive(Debug)]
pub struct RunResult {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Sample file written because the input directory had no CSV files.
    pub generated_sample: Option<PathBuf>,
    pub files: Vec<FileSummary>,
    pub errors: Vec<FileError>,
    pub duration: Duration,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug)]
pub struct FileSummary {
    pub file_name: String,
    pub rows: usize,
    pub original_columns: usize,
    pub final_columns: usize,
    pub stages: Vec<StageDelta>,
    /// Rows with at least one anomaly flag set.
    pub anomalous_rows: usize,
    pub final_output: PathBuf,
    pub intermediate_outputs: Vec<PathBuf>,
}

impl FileSummary {
    pub fn added_features(&self) -> usize {
        self.final_columns.saturating_sub(self.original_columns)
    }
}

/// Column counts around one stage.
#[derive(Debug, Clone, Copy)]
pub struct StageDelta {
    pub stage: StageKind,
    pub columns_before: usize,
    pub columns_after: usize,
    pub skipped: usize,
}

impl StageDelta {
    pub fn added(&self) -> usize {
        self.columns_after.saturating_sub(self.columns_before)
    }
}

#[derive(Debug)]
pub struct FileError {
    pub file_name: String,
    pub message: String,
}
