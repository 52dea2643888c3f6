//! Stage 5: anomaly flagging.
//!
//! Each priority column is checked twice: a Z-score test against the
//! population standard deviation and a Tukey fence test on the interquartile
//! range. A row is anomalous for a column when either test fires, and
//! `anomaly_score` counts the anomalous columns per row.

use feat_common::{column_f64, has_column, is_numeric_column};
use feat_model::{ColumnAnomalyCounts, SkipReason, StageKind};
use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::naming::{
    ANOMALY_SCORE, HAS_ANY_ANOMALY, anomaly_flag_column, iqr_flag_column, zscore_flag_column,
};
use crate::stage::{Stage, StageContext, StageOutput, append_column, begin_report, skip};
use crate::stats::{mean, population_std, quantile, sorted, usable_values};

/// Columns checked for outliers, in processing order.
pub const PRIORITY_COLUMNS: [&str; 7] = [
    "income",
    "purchase_amount",
    "final_price",
    "age",
    "shipping_cost",
    "discount_percent",
    "rating",
];

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// Flag values whose absolute Z-score exceeds `threshold`.
///
/// Missing values are never flagged. A zero or non-finite standard deviation
/// flags nothing.
pub fn zscore_flags(values: &[Option<f64>], threshold: f64) -> Vec<bool> {
    let data = usable_values(values);
    let (Some(mean), Some(std)) = (mean(&data), population_std(&data)) else {
        return vec![false; values.len()];
    };
    if std == 0.0 || !std.is_finite() {
        return vec![false; values.len()];
    }
    values
        .iter()
        .map(|v| usable(*v).is_some_and(|x| ((x - mean) / std).abs() > threshold))
        .collect()
}

/// Lower and upper Tukey fences `Q1 - k*IQR` and `Q3 + k*IQR`.
pub fn iqr_fences(values: &[Option<f64>], multiplier: f64) -> Option<(f64, f64)> {
    let data = sorted(&usable_values(values));
    let q1 = quantile(&data, 0.25)?;
    let q3 = quantile(&data, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - multiplier * iqr, q3 + multiplier * iqr))
}

/// Flag values outside the Tukey fences.
pub fn iqr_flags(values: &[Option<f64>], multiplier: f64) -> Vec<bool> {
    let Some((lower, upper)) = iqr_fences(values, multiplier) else {
        return vec![false; values.len()];
    };
    values
        .iter()
        .map(|v| usable(*v).is_some_and(|x| x < lower || x > upper))
        .collect()
}

fn flag_column(name: String, flags: &[bool]) -> Column {
    let values: Vec<i32> = flags.iter().map(|f| i32::from(*f)).collect();
    Column::new(name.into(), values)
}

/// Stage 5 of the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnomalyFlags;

impl Stage for AnomalyFlags {
    fn kind(&self) -> StageKind {
        StageKind::Anomaly
    }

    fn apply(&self, df: &DataFrame, ctx: &StageContext<'_>) -> Result<StageOutput> {
        let mut data = df.clone();
        let mut report = begin_report(self.kind(), df);
        let rows = df.height();
        let mut score = vec![0i32; rows];

        for column in PRIORITY_COLUMNS {
            let target = anomaly_flag_column(column);
            if !has_column(df, column) {
                skip(&mut report, target, SkipReason::MissingColumn(column.to_string()));
                continue;
            }
            if !is_numeric_column(df, column) {
                skip(&mut report, target, SkipReason::NotNumeric(column.to_string()));
                continue;
            }
            let values = column_f64(df, column)?;
            if usable_values(&values).is_empty() {
                skip(&mut report, target, SkipReason::NoData);
                continue;
            }

            let zscore = zscore_flags(&values, ctx.options.zscore_threshold);
            let iqr = iqr_flags(&values, ctx.options.iqr_multiplier);
            let combined: Vec<bool> = zscore.iter().zip(&iqr).map(|(z, i)| *z || *i).collect();

            append_column(&mut data, &mut report, flag_column(zscore_flag_column(column), &zscore))?;
            append_column(&mut data, &mut report, flag_column(iqr_flag_column(column), &iqr))?;
            append_column(&mut data, &mut report, flag_column(target, &combined))?;

            for (total, flagged) in score.iter_mut().zip(&combined) {
                *total += i32::from(*flagged);
            }

            let counts = ColumnAnomalyCounts {
                column: column.to_string(),
                zscore: zscore.iter().filter(|f| **f).count(),
                iqr: iqr.iter().filter(|f| **f).count(),
                combined: combined.iter().filter(|f| **f).count(),
            };
            info!(
                column,
                zscore = counts.zscore,
                iqr = counts.iqr,
                combined = counts.combined,
                "anomalies detected"
            );
            report.detected.push(column.to_string());
            report.anomaly_counts.push(counts);
        }

        let any: Vec<i32> = score.iter().map(|s| i32::from(*s > 0)).collect();
        let flagged_rows = any.iter().filter(|a| **a == 1).count();
        append_column(&mut data, &mut report, Column::new(ANOMALY_SCORE.into(), score))?;
        append_column(&mut data, &mut report, Column::new(HAS_ANY_ANOMALY.into(), any))?;

        let share = if rows == 0 {
            0.0
        } else {
            flagged_rows as f64 / rows as f64 * 100.0
        };
        info!(
            flagged_rows,
            rows,
            share = %format!("{share:.1}%"),
            "rows with at least one anomaly"
        );

        report.finish(data.width());
        Ok(StageOutput { data, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread(n: usize) -> Vec<Option<f64>> {
        (0..n).map(|i| Some((i % 10) as f64)).collect()
    }

    #[test]
    fn test_zscore_ignores_constant_column() {
        let values = vec![Some(5.0); 10];
        assert!(zscore_flags(&values, 3.0).iter().all(|f| !f));
    }

    #[test]
    fn test_zscore_missing_values_never_flagged() {
        let mut values = spread(100);
        values.push(None);
        values.push(Some(f64::NAN));
        values.push(Some(1000.0));

        let flags = zscore_flags(&values, 3.0);

        assert!(!flags[100]);
        assert!(!flags[101]);
        assert!(flags[102]);
    }

    #[test]
    fn test_iqr_fences() {
        let values: Vec<Option<f64>> = (1..=9).map(|v| Some(f64::from(v))).collect();
        let (lower, upper) = iqr_fences(&values, 1.5).unwrap();
        assert_eq!(lower, -3.0);
        assert_eq!(upper, 13.0);
    }

    #[test]
    fn test_iqr_missing_values_never_flagged() {
        let mut values = spread(100);
        values.push(None);
        values.push(Some(f64::NAN));
        values.push(Some(1000.0));

        let flags = iqr_flags(&values, 1.5);

        assert!(!flags[100]);
        assert!(!flags[101]);
        assert!(flags[102]);
        assert_eq!(flags.iter().filter(|f| **f).count(), 1);
    }

    #[test]
    fn test_stage_scores_and_skips() {
        let mut income = spread(40);
        income.push(Some(500.0));
        let rating: Vec<Option<f64>> = (0..41).map(|i| Some(f64::from(i % 5))).collect();
        let df = DataFrame::new(vec![
            Column::new("income".into(), income),
            Column::new("rating".into(), rating),
            Column::new("age".into(), vec!["old"; 41]),
        ])
        .unwrap();

        let out = AnomalyFlags.apply(&df, &StageContext::system()).unwrap();

        let score = out.data.column(ANOMALY_SCORE).unwrap().i32().unwrap();
        assert_eq!(score.get(40), Some(1));
        assert_eq!(score.get(0), Some(0));
        assert_eq!(out.report.detected, vec!["income", "rating"]);
        assert_eq!(out.report.total_combined_anomalies(), 1);
        assert!(out.report.skipped.iter().any(|s| s.target == "age_is_anomaly"
            && s.reason == SkipReason::NotNumeric("age".into())));
        assert_eq!(
            out.data.column(HAS_ANY_ANOMALY).unwrap().i32().unwrap().get(40),
            Some(1)
        );
    }

    #[test]
    fn test_stage_without_priority_columns() {
        let df = DataFrame::new(vec![Column::new("other".into(), vec![1.0f64, 2.0])]).unwrap();

        let out = AnomalyFlags.apply(&df, &StageContext::system()).unwrap();

        assert_eq!(out.report.added, vec![ANOMALY_SCORE, HAS_ANY_ANOMALY]);
        assert_eq!(out.report.skipped.len(), PRIORITY_COLUMNS.len());
    }
}
