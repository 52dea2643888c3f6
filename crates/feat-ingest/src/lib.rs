//! Data ingestion utilities.
//!
//! This crate loads comma-separated files with a header row into Polars
//! DataFrames and discovers input files in a directory.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use feat_ingest::{list_csv_files, read_csv_table};
//!
//! for path in list_csv_files(Path::new("input"))? {
//!     let df = read_csv_table(&path)?;
//!     println!("{}: {} rows", path.display(), df.height());
//! }
//! ```

mod csv;
mod discovery;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::read_csv_table;

// === File Discovery ===
pub use discovery::{ensure_dir, file_stem, list_csv_files};
