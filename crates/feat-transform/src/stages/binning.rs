//! Stage 3: range binning.
//!
//! Intervals are right-closed `(lo, hi]`. Fixed tables include their lowest
//! edge so the minimum value lands in the first bin; data-driven bins are
//! rebuilt from each table's own distribution.

use feat_common::{column_f64, has_column, is_numeric_column, round_to};
use feat_model::{SkipReason, StageKind};
use polars::prelude::*;
use tracing::{debug, info};

use crate::error::Result;
use crate::stage::{Stage, StageContext, StageOutput, append_column, begin_report, skip};
use crate::stats::{finite_values, quantile, sorted, usable_values};

/// Ordered edges with one label per interval.
#[derive(Debug, Clone, PartialEq)]
pub struct BinSpec {
    pub edges: Vec<f64>,
    pub labels: Vec<String>,
    /// Close the first interval on the left as well.
    pub include_lowest: bool,
}

impl BinSpec {
    pub fn new(edges: Vec<f64>, labels: Vec<String>, include_lowest: bool) -> Self {
        debug_assert_eq!(edges.len(), labels.len() + 1);
        Self {
            edges,
            labels,
            include_lowest,
        }
    }

    fn fixed(edges: &[f64], labels: &[&str]) -> Self {
        Self::new(
            edges.to_vec(),
            labels.iter().map(|l| (*l).to_string()).collect(),
            true,
        )
    }

    /// Label of the interval containing `value`, `None` outside all edges.
    pub fn assign(&self, value: f64) -> Option<&str> {
        if value.is_nan() {
            return None;
        }
        self.edges
            .windows(2)
            .enumerate()
            .find(|(idx, pair)| {
                let (lo, hi) = (pair[0], pair[1]);
                (value > lo && value <= hi) || (*idx == 0 && self.include_lowest && value == lo)
            })
            .map(|(idx, _)| self.labels[idx].as_str())
    }
}

/// Fixed age groups.
pub fn age_bins() -> BinSpec {
    BinSpec::fixed(
        &[0.0, 25.0, 35.0, 50.0, 65.0, 100.0],
        &["18-25", "26-35", "36-50", "51-65", "65+"],
    )
}

/// Fixed income brackets.
pub fn income_bins() -> BinSpec {
    BinSpec::fixed(
        &[0.0, 30_000.0, 50_000.0, 75_000.0, 100_000.0, f64::INFINITY],
        &["Low", "Lower-Middle", "Middle", "Upper-Middle", "High"],
    )
}

/// Fixed purchase amount categories.
pub fn purchase_bins() -> BinSpec {
    BinSpec::fixed(
        &[0.0, 100.0, 500.0, 1000.0, 2000.0, f64::INFINITY],
        &["Very Low", "Low", "Medium", "High", "Very High"],
    )
}

/// Fixed rating categories.
pub fn rating_bins() -> BinSpec {
    BinSpec::fixed(
        &[0.0, 2.0, 3.0, 4.0, 5.0],
        &["Poor", "Fair", "Good", "Excellent"],
    )
}

/// Fixed discount tiers.
pub fn discount_bins() -> BinSpec {
    BinSpec::fixed(
        &[0.0, 10.0, 25.0, 40.0, 100.0],
        &["No Discount", "Low", "Medium", "High Discount"],
    )
}

/// Quantile bins over the non-null, non-NaN values.
///
/// Duplicate edges are collapsed, so skewed data may produce fewer than
/// `count` bins. Labels are `Q1..Qk`. Returns `None` without usable values.
pub fn quantile_bins(values: &[Option<f64>], count: usize) -> Option<BinSpec> {
    let data = sorted(&usable_values(values));
    if data.is_empty() || count == 0 {
        return None;
    }
    let mut edges: Vec<f64> = (0..=count)
        .filter_map(|i| quantile(&data, i as f64 / count as f64))
        .collect();
    edges.dedup();
    if edges.len() == 1 {
        edges.push(edges[0]);
    }
    let labels = (1..edges.len()).map(|i| format!("Q{i}")).collect();
    Some(BinSpec::new(edges, labels, true))
}

/// Equal-width bins over `[min, max]` of the finite values.
///
/// The lower edge is pushed down by 0.1% of the range so the minimum falls in
/// the first bin. Returns `None` without finite values.
pub fn equal_width_bins(values: &[Option<f64>], count: usize) -> Option<BinSpec> {
    let data = finite_values(values);
    if data.is_empty() || count == 0 {
        return None;
    }
    let mut min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut edges: Vec<f64>;
    if min == max {
        let pad = if min == 0.0 { 0.001 } else { 0.001 * min.abs() };
        min -= pad;
        max += pad;
        edges = linspace(min, max, count);
    } else {
        edges = linspace(min, max, count);
        edges[0] -= (max - min) * 0.001;
    }

    let precision = label_precision(&edges);
    let labels = edges
        .windows(2)
        .map(|pair| {
            format!(
                "({:?}, {:?}]",
                round_edge(pair[0], precision),
                round_edge(pair[1], precision)
            )
        })
        .collect();
    Some(BinSpec::new(edges, labels, false))
}

const BASE_LABEL_PRECISION: u32 = 3;
const MAX_LABEL_PRECISION: u32 = 20;

/// Round an edge for display, keeping `precision` significant digits of a
/// purely fractional value and `precision` decimals otherwise.
fn round_edge(x: f64, precision: u32) -> f64 {
    if !x.is_finite() || x == 0.0 {
        return x;
    }
    if x.trunc() != 0.0 {
        return round_to(x, precision);
    }
    let magnitude = -(x.abs().log10().floor() as i32) - 1;
    let digits = (magnitude + precision as i32).max(0) as u32;
    round_to(x, digits)
}

/// Smallest precision from the base upwards that keeps every edge distinct.
fn label_precision(edges: &[f64]) -> u32 {
    (BASE_LABEL_PRECISION..MAX_LABEL_PRECISION)
        .find(|&precision| {
            let mut rounded: Vec<f64> = edges.iter().map(|e| round_edge(*e, precision)).collect();
            rounded.sort_by(f64::total_cmp);
            rounded.dedup();
            rounded.len() == edges.len()
        })
        .unwrap_or(BASE_LABEL_PRECISION)
}

fn linspace(min: f64, max: f64, count: usize) -> Vec<f64> {
    let step = (max - min) / count as f64;
    (0..=count)
        .map(|i| if i == count { max } else { min + step * i as f64 })
        .collect()
}

/// How a column's bin edges are obtained.
#[derive(Debug, Clone, Copy)]
pub enum BinStrategy {
    Fixed(fn() -> BinSpec),
    Quantile(usize),
    EqualWidth(usize),
}

/// A binned output column and its numeric source.
#[derive(Debug, Clone, Copy)]
pub struct BinRule {
    pub source: &'static str,
    pub target: &'static str,
    pub strategy: BinStrategy,
}

/// Binning rules in output order.
pub const BIN_RULES: &[BinRule] = &[
    BinRule {
        source: "age",
        target: "age_group",
        strategy: BinStrategy::Fixed(age_bins),
    },
    BinRule {
        source: "income",
        target: "income_bracket",
        strategy: BinStrategy::Fixed(income_bins),
    },
    BinRule {
        source: "purchase_amount",
        target: "purchase_category",
        strategy: BinStrategy::Fixed(purchase_bins),
    },
    BinRule {
        source: "rating",
        target: "rating_category",
        strategy: BinStrategy::Fixed(rating_bins),
    },
    BinRule {
        source: "discount_percent",
        target: "discount_tier",
        strategy: BinStrategy::Fixed(discount_bins),
    },
    BinRule {
        source: "final_price",
        target: "price_quartile",
        strategy: BinStrategy::Quantile(4),
    },
    BinRule {
        source: "income_purchase_ratio",
        target: "spending_ratio_bin",
        strategy: BinStrategy::EqualWidth(5),
    },
];

impl BinRule {
    fn spec(&self, values: &[Option<f64>]) -> Option<BinSpec> {
        match self.strategy {
            BinStrategy::Fixed(build) => {
                if usable_values(values).is_empty() {
                    None
                } else {
                    Some(build())
                }
            }
            BinStrategy::Quantile(count) => quantile_bins(values, count),
            BinStrategy::EqualWidth(count) => equal_width_bins(values, count),
        }
    }
}

/// Stage 3 of the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeBinning;

impl Stage for RangeBinning {
    fn kind(&self) -> StageKind {
        StageKind::Binned
    }

    fn apply(&self, df: &DataFrame, _ctx: &StageContext<'_>) -> Result<StageOutput> {
        let mut data = df.clone();
        let mut report = begin_report(self.kind(), df);

        for rule in BIN_RULES {
            if !has_column(df, rule.source) {
                skip(
                    &mut report,
                    rule.target,
                    SkipReason::MissingColumn(rule.source.to_string()),
                );
                continue;
            }
            if !is_numeric_column(df, rule.source) {
                skip(
                    &mut report,
                    rule.target,
                    SkipReason::NotNumeric(rule.source.to_string()),
                );
                continue;
            }
            let values = column_f64(df, rule.source)?;
            let Some(spec) = rule.spec(&values) else {
                skip(&mut report, rule.target, SkipReason::NoData);
                continue;
            };
            debug!(column = rule.source, edges = ?spec.edges, "bin edges");

            let labels: Vec<Option<&str>> = values
                .iter()
                .map(|v| v.and_then(|x| spec.assign(x)))
                .collect();
            append_column(&mut data, &mut report, Column::new(rule.target.into(), labels))?;
        }

        report.finish(data.width());
        info!(
            created = report.added.len(),
            skipped = report.skipped.len(),
            "range bins assigned"
        );
        Ok(StageOutput { data, report })
    }
}
