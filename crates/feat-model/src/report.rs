//! Stage execution reports.
//!
//! A stage never fails because an input column is absent. Instead every
//! derivation it could not perform is recorded as a [`Skip`] so that the
//! graceful-degradation behaviour stays visible to callers and tests.

use serde::{Deserialize, Serialize};

use crate::stage::StageKind;

/// Why a derivation was not performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// A required source column is absent.
    MissingColumn(String),
    /// A required source column exists but does not hold numbers.
    NotNumeric(String),
    /// A candidate timestamp column holds values that do not parse.
    NotTemporal(String),
    /// The target column already exists and would be overwritten.
    AlreadyPresent,
    /// The source column has no usable values.
    NoData,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn(column) => write!(f, "missing column '{column}'"),
            Self::NotNumeric(column) => write!(f, "column '{column}' is not numeric"),
            Self::NotTemporal(column) => {
                write!(f, "column '{column}' does not parse as timestamps")
            }
            Self::AlreadyPresent => f.write_str("target column already present"),
            Self::NoData => f.write_str("no usable values"),
        }
    }
}

/// A derivation that was not performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skip {
    /// Column (or feature group) that would have been produced.
    pub target: String,
    pub reason: SkipReason,
}

/// Outlier counts for one checked column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAnomalyCounts {
    pub column: String,
    pub zscore: usize,
    pub iqr: usize,
    pub combined: usize,
}

/// Outcome of running one stage over one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: StageKind,
    /// Row count, identical before and after the stage.
    pub rows: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    /// Newly created columns, in creation order.
    pub added: Vec<String>,
    pub skipped: Vec<Skip>,
    /// Source columns the stage selected for processing.
    #[serde(default)]
    pub detected: Vec<String>,
    #[serde(default)]
    pub anomaly_counts: Vec<ColumnAnomalyCounts>,
}

impl StageReport {
    pub fn new(stage: StageKind, rows: usize, columns_before: usize) -> Self {
        Self {
            stage,
            rows,
            columns_before,
            columns_after: columns_before,
            added: Vec::new(),
            skipped: Vec::new(),
            detected: Vec::new(),
            anomaly_counts: Vec::new(),
        }
    }

    pub fn record_added(&mut self, column: impl Into<String>) {
        self.added.push(column.into());
    }

    pub fn record_skip(&mut self, target: impl Into<String>, reason: SkipReason) {
        self.skipped.push(Skip {
            target: target.into(),
            reason,
        });
    }

    /// Set the final column count once the stage has completed.
    pub fn finish(&mut self, columns_after: usize) {
        self.columns_after = columns_after;
    }

    /// Number of columns the stage appended.
    pub fn columns_added(&self) -> usize {
        self.columns_after.saturating_sub(self.columns_before)
    }

    pub fn was_skipped(&self, target: &str) -> bool {
        self.skipped.iter().any(|skip| skip.target == target)
    }

    /// Sum of combined flags over all checked columns.
    pub fn total_combined_anomalies(&self) -> usize {
        self.anomaly_counts.iter().map(|c| c.combined).sum()
    }
}
