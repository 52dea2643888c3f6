//! Shared utilities for the feature pipeline crates.
//!
//! This crate provides rounding and the Polars DataFrame accessors used by
//! every stage.

pub mod numeric;
pub mod polars;

pub use numeric::round_to;
pub use polars::{
    column_f64, column_strings, has_column, is_numeric_column, is_numeric_dtype, is_text_column,
};
