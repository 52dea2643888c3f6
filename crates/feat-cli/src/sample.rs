//! Synthetic customer-purchase data for demos and empty input directories.
//!
//! Five percent of the rows carry injected income and purchase outliers so
//! that the anomaly stage has something to find.

use std::path::Path;

use chrono::{Duration, NaiveDate};
use feat_common::round_to;
use feat_output::write_csv;
use polars::prelude::{Column, DataFrame, PolarsResult};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::info;

pub const DEFAULT_ROWS: usize = 1000;
pub const DEFAULT_SEED: u64 = 42;
pub const SAMPLE_FILE_NAME: &str = "sample_data.csv";

const GENDERS: [&str; 3] = ["Male", "Female", "Other"];
const EDUCATION: [&str; 4] = ["High School", "Bachelor", "Master", "PhD"];
const CATEGORIES: [&str; 5] = ["Electronics", "Clothing", "Food", "Books", "Home"];

fn pick(rng: &mut StdRng, options: &[&'static str]) -> &'static str {
    options[rng.random_range(0..options.len())]
}

fn uniform(rng: &mut StdRng, low: f64, high: f64, decimals: u32) -> f64 {
    round_to(rng.random_range(low..high), decimals)
}

/// Build `rows` sample records dated up to a year before `today`.
///
/// The same `seed` and `today` always produce the same table.
pub fn generate_sample(rows: usize, seed: u64, today: NaiveDate) -> PolarsResult<DataFrame> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut income: Vec<i64> = (0..rows).map(|_| rng.random_range(20_000..150_000)).collect();
    let mut purchase_amount: Vec<f64> = (0..rows)
        .map(|_| uniform(&mut rng, 10.0, 5000.0, 2))
        .collect();
    let outliers = rows / 20;
    for idx in index::sample(&mut rng, rows, outliers) {
        income[idx] = rng.random_range(200_000..500_000);
        purchase_amount[idx] = uniform(&mut rng, 8000.0, 15_000.0, 2);
    }

    let customer_id: Vec<i64> = (1..=rows as i64).collect();
    let age: Vec<i64> = (0..rows).map(|_| rng.random_range(18..80)).collect();
    let gender: Vec<&str> = (0..rows).map(|_| pick(&mut rng, &GENDERS)).collect();
    let education: Vec<&str> = (0..rows).map(|_| pick(&mut rng, &EDUCATION)).collect();
    let purchase_date: Vec<String> = (0..rows)
        .map(|_| (today - Duration::days(rng.random_range(0..365))).to_string())
        .collect();
    let product_category: Vec<&str> = (0..rows).map(|_| pick(&mut rng, &CATEGORIES)).collect();
    let rating: Vec<f64> = (0..rows).map(|_| uniform(&mut rng, 1.0, 5.0, 1)).collect();
    let discount_percent: Vec<f64> = (0..rows)
        .map(|_| uniform(&mut rng, 0.0, 50.0, 2))
        .collect();
    let shipping_cost: Vec<f64> = (0..rows)
        .map(|_| uniform(&mut rng, 0.0, 50.0, 2))
        .collect();

    DataFrame::new(vec![
        Column::new("customer_id".into(), customer_id),
        Column::new("age".into(), age),
        Column::new("gender".into(), gender),
        Column::new("education".into(), education),
        Column::new("income".into(), income),
        Column::new("purchase_amount".into(), purchase_amount),
        Column::new("purchase_date".into(), purchase_date),
        Column::new("product_category".into(), product_category),
        Column::new("rating".into(), rating),
        Column::new("discount_percent".into(), discount_percent),
        Column::new("shipping_cost".into(), shipping_cost),
    ])
}

/// Generate a sample table and write it to `path`.
pub fn write_sample(path: &Path, rows: usize, seed: u64, today: NaiveDate) -> anyhow::Result<()> {
    let mut df = generate_sample(rows, seed, today)?;
    write_csv(&mut df, path)?;
    info!(path = %path.display(), rows, columns = df.width(), "sample data generated");
    Ok(())
}
