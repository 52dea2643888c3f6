//! The table carried between stages, with its provenance.

use std::path::{Path, PathBuf};

use feat_ingest::{file_stem, read_csv_table};
use polars::prelude::DataFrame;

use crate::error::Result;

/// A table moving through the pipeline together with where it came from.
#[derive(Debug, Clone)]
pub struct FeatureFrame {
    /// Base name used for output files (`<base>_FINAL.csv`).
    pub base_name: String,
    /// The CSV file the table was loaded from, if any.
    pub source_file: Option<PathBuf>,
    /// Column count before any stage ran.
    pub original_columns: usize,
    pub data: DataFrame,
}

impl FeatureFrame {
    /// Wrap an in-memory table.
    pub fn new(base_name: impl Into<String>, data: DataFrame) -> Self {
        Self {
            base_name: base_name.into(),
            source_file: None,
            original_columns: data.width(),
            data,
        }
    }

    /// Load a CSV file, naming outputs after its file stem.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let data = read_csv_table(path)?;
        Ok(Self::new(file_stem(path), data).with_source_file(path.to_path_buf()))
    }

    pub fn with_source_file(mut self, path: PathBuf) -> Self {
        self.source_file = Some(path);
        self
    }

    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    /// Number of columns added since the frame was created.
    pub fn added_columns(&self) -> usize {
        self.data.width().saturating_sub(self.original_columns)
    }
}
