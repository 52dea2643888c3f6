//! Stage 2: categorical encoding.
//!
//! Text columns are split by role: `education` gets a fixed ordinal rank,
//! `gender` and `product_category` get one indicator column per observed
//! value, every other text column gets a frequency encoding. Text columns
//! whose values all parse as timestamps are left for the temporal stage.

use std::collections::{BTreeSet, HashMap};

use feat_common::{column_strings, round_to};
use feat_model::{SkipReason, StageKind};
use polars::prelude::*;
use tracing::info;

use crate::datetime::all_timestamps;
use crate::error::Result;
use crate::naming::{frequency_column, one_hot_column, ordinal_column};
use crate::stage::{Stage, StageContext, StageOutput, append_column, begin_report, skip};

/// Known education levels in rank order.
pub const EDUCATION_LEVELS: [&str; 4] = ["High School", "Bachelor", "Master", "PhD"];

/// Columns that receive one indicator column per distinct value.
pub const ONE_HOT_COLUMNS: [&str; 2] = ["gender", "product_category"];

/// How a categorical column is turned into numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ordinal,
    OneHot,
    Frequency,
}

impl Encoding {
    /// Pick the strategy for a categorical column by name.
    pub fn for_column(name: &str) -> Self {
        if name == "education" {
            Self::Ordinal
        } else if ONE_HOT_COLUMNS.contains(&name) {
            Self::OneHot
        } else {
            Self::Frequency
        }
    }
}

/// Rank of an education level, `None` for unknown values.
pub fn education_rank(value: &str) -> Option<i32> {
    EDUCATION_LEVELS
        .iter()
        .position(|level| *level == value)
        .map(|idx| idx as i32)
}

/// Text columns that are not date-like, in frame order.
pub fn categorical_columns(df: &DataFrame) -> Result<Vec<String>> {
    let mut detected = Vec::new();
    for column in df.get_columns() {
        if !matches!(column.dtype(), DataType::String) {
            continue;
        }
        let name = column.name().as_str();
        let values = column_strings(df, name)?;
        if all_timestamps(&values) {
            continue;
        }
        detected.push(name.to_string());
    }
    Ok(detected)
}

fn ordinal(name: &str, values: &[Option<String>]) -> Column {
    let ranks: Vec<Option<i32>> = values
        .iter()
        .map(|v| v.as_deref().and_then(education_rank))
        .collect();
    Column::new(ordinal_column(name).into(), ranks)
}

fn one_hot(name: &str, values: &[Option<String>]) -> Vec<Column> {
    let distinct: BTreeSet<&str> = values.iter().flatten().map(String::as_str).collect();
    distinct
        .into_iter()
        .map(|category| {
            let indicator: Vec<i32> = values
                .iter()
                .map(|v| i32::from(v.as_deref() == Some(category)))
                .collect();
            Column::new(one_hot_column(name, category).into(), indicator)
        })
        .collect()
}

fn frequency(name: &str, values: &[Option<String>]) -> Column {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.iter().flatten() {
        *counts.entry(value.as_str()).or_default() += 1;
    }
    let total: usize = counts.values().sum();
    let shares: Vec<Option<f64>> = values
        .iter()
        .map(|v| {
            let count = *counts.get(v.as_deref()?)?;
            Some(round_to(count as f64 / total as f64, 4))
        })
        .collect();
    Column::new(frequency_column(name).into(), shares)
}

/// Stage 2 of the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoricalEncoding;

impl Stage for CategoricalEncoding {
    fn kind(&self) -> StageKind {
        StageKind::Encoded
    }

    fn apply(&self, df: &DataFrame, _ctx: &StageContext<'_>) -> Result<StageOutput> {
        let mut data = df.clone();
        let mut report = begin_report(self.kind(), df);
        let categorical = categorical_columns(df)?;
        info!(columns = ?categorical, "categorical columns detected");

        for name in &categorical {
            let values = column_strings(df, name)?;
            match Encoding::for_column(name) {
                Encoding::Ordinal => {
                    append_column(&mut data, &mut report, ordinal(name, &values))?;
                }
                Encoding::OneHot => {
                    let indicators = one_hot(name, &values);
                    if indicators.is_empty() {
                        skip(&mut report, name.as_str(), SkipReason::NoData);
                    }
                    for column in indicators {
                        append_column(&mut data, &mut report, column)?;
                    }
                }
                Encoding::Frequency => {
                    append_column(&mut data, &mut report, frequency(name, &values))?;
                }
            }
        }

        report.detected = categorical;
        report.finish(data.width());
        info!(
            created = report.added.len(),
            skipped = report.skipped.len(),
            "categorical columns encoded"
        );
        Ok(StageOutput { data, report })
    }
}
