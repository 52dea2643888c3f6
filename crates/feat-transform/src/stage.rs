//! Stage abstraction shared by the five transformations.
//!
//! Every stage receives the full output of its predecessor and returns a new
//! frame that is a superset of the input: same rows in the same order, all
//! input columns untouched, derived columns appended at the end.

use feat_model::{PipelineOptions, SkipReason, StageKind, StageReport};
use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TransformError};

static SYSTEM_CLOCK: SystemClock = SystemClock;

/// Run-wide settings handed to each stage.
#[derive(Clone)]
pub struct StageContext<'a> {
    pub options: PipelineOptions,
    pub clock: &'a dyn Clock,
}

impl StageContext<'static> {
    /// Default options with the local wall clock.
    pub fn system() -> Self {
        Self::new(&SYSTEM_CLOCK)
    }
}

impl<'a> StageContext<'a> {
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self {
            options: PipelineOptions::default(),
            clock,
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }
}

/// Result of running one stage.
#[derive(Debug, Clone)]
pub struct StageOutput {
    pub data: DataFrame,
    pub report: StageReport,
}

/// One transformation from an input table to an enriched table.
pub trait Stage: Send + Sync {
    fn kind(&self) -> StageKind;

    /// Derive new columns from `df`.
    ///
    /// The input is never mutated. Derivations whose inputs are unavailable
    /// are skipped and recorded in the report.
    ///
    /// # Errors
    ///
    /// Returns an error only for stage-fatal failures (Polars errors, column
    /// length mismatches).
    fn apply(&self, df: &DataFrame, ctx: &StageContext<'_>) -> Result<StageOutput>;
}

/// Append `column` to `df` unless a column of that name already exists.
///
/// Returns `true` when the column was added.
pub(crate) fn append_column(
    df: &mut DataFrame,
    report: &mut StageReport,
    column: Column,
) -> Result<bool> {
    let name = column.name().to_string();
    if df.get_column_index(&name).is_some() {
        debug!(stage = %report.stage, column = %name, "skipped: target column already present");
        report.record_skip(name, SkipReason::AlreadyPresent);
        return Ok(false);
    }
    if df.width() > 0 && column.len() != df.height() {
        return Err(TransformError::LengthMismatch {
            column: name,
            expected: df.height(),
            actual: column.len(),
        });
    }
    df.with_column(column)?;
    debug!(stage = %report.stage, column = %name, "created column");
    report.record_added(name);
    Ok(true)
}

/// Record a skipped derivation and log the reason.
pub(crate) fn skip(report: &mut StageReport, target: impl Into<String>, reason: SkipReason) {
    let target = target.into();
    debug!(stage = %report.stage, target = %target, reason = %reason, "skipped derivation");
    report.record_skip(target, reason);
}

/// Start a report for `stage` over `df`.
pub(crate) fn begin_report(stage: StageKind, df: &DataFrame) -> StageReport {
    StageReport::new(stage, df.height(), df.width())
}
