//! Output generation for pipeline tables.
//!
//! Tables are persisted as comma-separated text with a header row, in the
//! frame's column order. Intermediate tables are named after the stage that
//! produced them; the last table gets a `_FINAL` suffix.

use std::fs::File;
use std::path::{Path, PathBuf};

use feat_model::StageKind;
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

/// Errors raised while persisting a table.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {message}")]
    CsvWrite { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, OutputError>;

/// Path of the table produced by `stage` for the input named `base_name`.
///
/// The anomaly stage produces the final table, see [`final_output_path`].
pub fn stage_output_path(dir: &Path, base_name: &str, stage: StageKind) -> PathBuf {
    dir.join(format!(
        "{base_name}_step{}_{}.csv",
        stage.number(),
        stage.slug()
    ))
}

/// Path of the final enriched table for the input named `base_name`.
pub fn final_output_path(dir: &Path, base_name: &str) -> PathBuf {
    dir.join(format!("{base_name}_FINAL.csv"))
}

/// Write `df` to `path` as CSV with a header row.
///
/// Missing parent directories are created.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let mut file = File::create(path).map_err(|e| OutputError::CreateFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| OutputError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "wrote csv"
    );
    Ok(())
}
