//! CSV reading into Polars DataFrames.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Returns true if the file has a non-blank first line.
fn has_header_line(path: &Path) -> Result<bool> {
    let file = File::open(path).map_err(|_| IngestError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let cleaned = first.trim_start_matches('\u{feff}').trim();
    Ok(!cleaned.is_empty())
}

/// Reads a comma-separated file with a single header row into a DataFrame.
///
/// Column dtypes are inferred from the whole file so a float appearing late
/// in an otherwise integral column still parses. Date-like text is kept as
/// `String`; timestamp detection happens in the transform stages.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if !has_header_line(path)? {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded csv"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_table_infers_types() {
        let file = create_temp_csv(
            "customer_id,age,gender,rating,purchase_date\n1,34,Male,4.5,2024-03-15\n2,51,Female,3.0,2024-04-01\n",
        );
        let df = read_csv_table(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 5);
        assert_eq!(df.column("age").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("rating").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("gender").unwrap().dtype(), &DataType::String);
        assert_eq!(
            df.column("purchase_date").unwrap().dtype(),
            &DataType::String
        );
    }

    #[test]
    fn test_read_csv_table_late_float() {
        let mut content = String::from("amount\n");
        for i in 0..150 {
            content.push_str(&format!("{i}\n"));
        }
        content.push_str("12.5\n");
        let file = create_temp_csv(&content);
        let df = read_csv_table(file.path()).unwrap();

        assert_eq!(df.height(), 151);
        assert_eq!(df.column("amount").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_read_csv_table_empty_file() {
        let file = create_temp_csv("");
        let result = read_csv_table(file.path());
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_csv_table_missing_file() {
        let result = read_csv_table(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
