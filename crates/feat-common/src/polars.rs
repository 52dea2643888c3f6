//! Polars DataFrame accessors.
//!
//! Stages work on plain `Vec<Option<_>>` buffers extracted from a frame and
//! append freshly built columns. These helpers do the extraction.

use polars::prelude::*;

/// Returns true for integer and floating-point dtypes.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    dtype.is_integer() || dtype.is_float()
}

/// Returns true if the frame contains a column with exactly this name.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Returns true if `name` exists and holds numeric values.
pub fn is_numeric_column(df: &DataFrame, name: &str) -> bool {
    df.column(name)
        .map(|column| is_numeric_dtype(column.dtype()))
        .unwrap_or(false)
}

/// Returns true if `name` exists and holds text values.
pub fn is_text_column(df: &DataFrame, name: &str) -> bool {
    df.column(name)
        .map(|column| matches!(column.dtype(), DataType::String))
        .unwrap_or(false)
}

/// Extract a column as `f64` values, casting integers.
///
/// # Errors
///
/// Returns an error if the column is missing or cannot be cast to `Float64`.
pub fn column_f64(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

/// Extract a column as owned strings, casting non-text dtypes.
///
/// # Errors
///
/// Returns an error if the column is missing or cannot be cast to `String`.
pub fn column_strings(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        DataFrame::new(vec![
            Column::new("age".into(), vec![25i64, 40]),
            Column::new("rating".into(), vec![Some(4.5f64), None]),
            Column::new("gender".into(), vec!["Male", "Female"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_numeric_detection() {
        let df = sample_df();
        assert!(is_numeric_column(&df, "age"));
        assert!(is_numeric_column(&df, "rating"));
        assert!(!is_numeric_column(&df, "gender"));
        assert!(!is_numeric_column(&df, "missing"));
        assert!(is_text_column(&df, "gender"));
    }

    #[test]
    fn test_column_f64_casts_integers() {
        let df = sample_df();
        assert_eq!(column_f64(&df, "age").unwrap(), vec![Some(25.0), Some(40.0)]);
        assert_eq!(column_f64(&df, "rating").unwrap(), vec![Some(4.5), None]);
    }

    #[test]
    fn test_column_strings() {
        let df = sample_df();
        assert_eq!(
            column_strings(&df, "gender").unwrap(),
            vec![Some("Male".to_string()), Some("Female".to_string())]
        );
        assert!(column_strings(&df, "missing").is_err());
    }
}
