//! Stage 1: computed columns.
//!
//! Each derivation is a registry entry naming its numeric inputs. Entries are
//! evaluated in order against the frame as it grows, so `final_price` sees
//! the `total_cost` and `discount_amount` columns created just before it.
//! An entry whose inputs are absent is skipped, never an error.

use feat_common::{column_f64, has_column, is_numeric_column, round_to};
use feat_model::{SkipReason, StageKind};
use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::stage::{Stage, StageContext, StageOutput, append_column, begin_report, skip};

/// One computed column and the numeric columns it needs.
pub struct Derivation {
    pub target: &'static str,
    pub requires: &'static [&'static str],
    compute: fn(&DataFrame) -> Result<Column>,
}

impl Derivation {
    /// Check that every required column exists and is numeric.
    pub fn capability(&self, df: &DataFrame) -> Option<SkipReason> {
        for &name in self.requires {
            if !has_column(df, name) {
                return Some(SkipReason::MissingColumn(name.to_string()));
            }
            if !is_numeric_column(df, name) {
                return Some(SkipReason::NotNumeric(name.to_string()));
            }
        }
        None
    }
}

/// Derivations in evaluation order.
pub const DERIVATIONS: &[Derivation] = &[
    Derivation {
        target: "total_cost",
        requires: &["purchase_amount", "shipping_cost"],
        compute: total_cost,
    },
    Derivation {
        target: "discount_amount",
        requires: &["purchase_amount", "discount_percent"],
        compute: discount_amount,
    },
    Derivation {
        target: "final_price",
        requires: &["total_cost", "discount_amount"],
        compute: final_price,
    },
    Derivation {
        target: "price_per_rating",
        requires: &["final_price", "rating"],
        compute: price_per_rating,
    },
    Derivation {
        target: "income_purchase_ratio",
        requires: &["purchase_amount", "income"],
        compute: income_purchase_ratio,
    },
    Derivation {
        target: "age_squared",
        requires: &["age"],
        compute: age_squared,
    },
    Derivation {
        target: "spending_power_index",
        requires: &["income", "age"],
        compute: spending_power_index,
    },
];

/// Combine two numeric columns row by row; a null operand yields null.
fn combine(
    df: &DataFrame,
    left: &str,
    right: &str,
    op: impl Fn(f64, f64) -> f64,
) -> Result<Vec<Option<f64>>> {
    let lhs = column_f64(df, left)?;
    let rhs = column_f64(df, right)?;
    Ok(lhs
        .into_iter()
        .zip(rhs)
        .map(|(a, b)| Some(op(a?, b?)))
        .collect())
}

fn rounded(name: &str, values: Vec<Option<f64>>) -> Column {
    let values: Vec<Option<f64>> = values
        .into_iter()
        .map(|v| v.map(|x| round_to(x, 2)))
        .collect();
    Column::new(name.into(), values)
}

fn total_cost(df: &DataFrame) -> Result<Column> {
    let values = combine(df, "purchase_amount", "shipping_cost", |a, b| a + b)?;
    Ok(rounded("total_cost", values))
}

fn discount_amount(df: &DataFrame) -> Result<Column> {
    let values = combine(df, "purchase_amount", "discount_percent", |a, b| a * b / 100.0)?;
    Ok(rounded("discount_amount", values))
}

fn final_price(df: &DataFrame) -> Result<Column> {
    let values = combine(df, "total_cost", "discount_amount", |a, b| a - b)?;
    Ok(rounded("final_price", values))
}

// rating == 0 produces ±inf (or NaN for 0/0); the value is kept as is.
fn price_per_rating(df: &DataFrame) -> Result<Column> {
    let values = combine(df, "final_price", "rating", |a, b| a / b)?;
    Ok(rounded("price_per_rating", values))
}

fn income_purchase_ratio(df: &DataFrame) -> Result<Column> {
    let values = combine(df, "purchase_amount", "income", |a, b| a / b * 100.0)?;
    Ok(rounded("income_purchase_ratio", values))
}

fn age_squared(df: &DataFrame) -> Result<Column> {
    let age = df.column("age")?;
    if age.dtype().is_integer() {
        let ints = age.cast(&DataType::Int64)?;
        let values: Vec<Option<i64>> = ints
            .i64()?
            .into_iter()
            .map(|v| v.and_then(|x| x.checked_mul(x)))
            .collect();
        return Ok(Column::new("age_squared".into(), values));
    }
    let values: Vec<Option<f64>> = column_f64(df, "age")?
        .into_iter()
        .map(|v| v.map(|x| x.powi(2)))
        .collect();
    Ok(Column::new("age_squared".into(), values))
}

fn spending_power_index(df: &DataFrame) -> Result<Column> {
    let values = combine(df, "income", "age", |income, age| (income / 1000.0) / age)?;
    Ok(rounded("spending_power_index", values))
}

/// Stage 1 of the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputedColumns;

impl Stage for ComputedColumns {
    fn kind(&self) -> StageKind {
        StageKind::Computed
    }

    fn apply(&self, df: &DataFrame, _ctx: &StageContext<'_>) -> Result<StageOutput> {
        let mut data = df.clone();
        let mut report = begin_report(self.kind(), df);

        for derivation in DERIVATIONS {
            if let Some(reason) = derivation.capability(&data) {
                skip(&mut report, derivation.target, reason);
                continue;
            }
            let column = (derivation.compute)(&data)?;
            append_column(&mut data, &mut report, column)?;
        }

        report.finish(data.width());
        info!(
            created = report.added.len(),
            skipped = report.skipped.len(),
            "computed columns derived"
        );
        Ok(StageOutput { data, report })
    }
}
