//! Whole-pipeline laws: row count is preserved and every stage only appends.

use chrono::NaiveDate;
use feat_transform::{FeaturePipeline, FixedClock, StageContext};
use polars::prelude::*;
use proptest::prelude::*;

const GENDERS: [&str; 3] = ["Male", "Female", "Other"];
const EDUCATION: [&str; 5] = ["High School", "Bachelor", "Master", "PhD", "Unknown"];
const CATEGORIES: [&str; 3] = ["Books", "Clothing", "Electronics"];

#[derive(Debug, Clone)]
struct Row {
    age: i64,
    gender: usize,
    education: usize,
    income: f64,
    purchase: f64,
    day_offset: i64,
    category: usize,
    rating: f64,
    discount: i64,
    shipping: f64,
}

fn row_strategy() -> impl Strategy<Value = Row> {
    (
        18i64..80,
        0usize..GENDERS.len(),
        0usize..EDUCATION.len(),
        0.0f64..500_000.0,
        0.0f64..15_000.0,
        0i64..365,
        0usize..CATEGORIES.len(),
        0.0f64..5.0,
        0i64..50,
        0.0f64..50.0,
    )
        .prop_map(
            |(age, gender, education, income, purchase, day_offset, category, rating, discount, shipping)| Row {
                age,
                gender,
                education,
                income,
                purchase,
                day_offset,
                category,
                rating,
                discount,
                shipping,
            },
        )
}

fn build_frame(rows: &[Row], keep: &[bool; 6]) -> DataFrame {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut columns = vec![Column::new(
        "customer_id".into(),
        (1..=rows.len() as i64).collect::<Vec<_>>(),
    )];
    if keep[0] {
        columns.push(Column::new("age".into(), rows.iter().map(|r| r.age).collect::<Vec<_>>()));
    }
    if keep[1] {
        columns.push(Column::new(
            "gender".into(),
            rows.iter().map(|r| GENDERS[r.gender]).collect::<Vec<_>>(),
        ));
        columns.push(Column::new(
            "education".into(),
            rows.iter().map(|r| EDUCATION[r.education]).collect::<Vec<_>>(),
        ));
    }
    if keep[2] {
        columns.push(Column::new(
            "income".into(),
            rows.iter().map(|r| r.income).collect::<Vec<_>>(),
        ));
    }
    if keep[3] {
        columns.push(Column::new(
            "purchase_amount".into(),
            rows.iter().map(|r| r.purchase).collect::<Vec<_>>(),
        ));
        columns.push(Column::new(
            "shipping_cost".into(),
            rows.iter().map(|r| r.shipping).collect::<Vec<_>>(),
        ));
        columns.push(Column::new(
            "discount_percent".into(),
            rows.iter().map(|r| r.discount).collect::<Vec<_>>(),
        ));
    }
    if keep[4] {
        columns.push(Column::new(
            "purchase_date".into(),
            rows.iter()
                .map(|r| (start + chrono::Duration::days(r.day_offset)).to_string())
                .collect::<Vec<_>>(),
        ));
    }
    if keep[5] {
        columns.push(Column::new(
            "product_category".into(),
            rows.iter().map(|r| CATEGORIES[r.category]).collect::<Vec<_>>(),
        ));
        columns.push(Column::new(
            "rating".into(),
            rows.iter().map(|r| r.rating).collect::<Vec<_>>(),
        ));
    }
    DataFrame::new(columns).unwrap()
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|n| n.to_string()).collect()
}

fn same_values(left: &DataFrame, right: &DataFrame, name: &str) -> bool {
    let left = left.column(name).unwrap().as_materialized_series();
    let right = right.column(name).unwrap().as_materialized_series();
    left.equals_missing(right)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn stages_preserve_rows_and_only_append(
        rows in prop::collection::vec(row_strategy(), 1..40),
        keep in any::<[bool; 6]>(),
    ) {
        let df = build_frame(&rows, &keep);
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        let ctx = StageContext::new(&clock);
        let mut previous = df.clone();
        let mut violations = Vec::new();

        let output = FeaturePipeline::default()
            .run_with(df.clone(), &ctx, |stage| {
                if stage.data.height() != previous.height() {
                    violations.push(format!("{} changed the row count", stage.report.stage));
                }
                let names = column_names(&stage.data);
                for (idx, name) in column_names(&previous).iter().enumerate() {
                    if names.get(idx) != Some(name) {
                        violations.push(format!("{} moved or dropped {name}", stage.report.stage));
                    } else if !same_values(&stage.data, &previous, name) {
                        violations.push(format!("{} rewrote {name}", stage.report.stage));
                    }
                }
                previous = stage.data.clone();
                Ok(())
            })
            .unwrap();

        prop_assert!(violations.is_empty(), "{violations:?}");
        prop_assert_eq!(output.data.height(), rows.len());
        prop_assert_eq!(output.reports.len(), 5);
    }
}

#[test]
fn test_final_column_layout() {
    let df = DataFrame::new(vec![
        Column::new("customer_id".into(), vec![1i64, 2, 3]),
        Column::new("age".into(), vec![25i64, 41, 67]),
        Column::new("gender".into(), vec!["Female", "Male", "Other"]),
        Column::new("education".into(), vec!["Bachelor", "Master", "PhD"]),
        Column::new("income".into(), vec![42_000.0f64, 88_500.0, 130_000.0]),
        Column::new("purchase_amount".into(), vec![120.5f64, 980.0, 2_450.0]),
        Column::new(
            "purchase_date".into(),
            vec!["2024-03-15", "2024-06-02", "2024-06-28"],
        ),
        Column::new("product_category".into(), vec!["Books", "Clothing", "Electronics"]),
        Column::new("rating".into(), vec![4.5f64, 3.0, 0.0]),
        Column::new("discount_percent".into(), vec![0i64, 15, 45]),
        Column::new("shipping_cost".into(), vec![5.0f64, 12.5, 0.0]),
    ])
    .unwrap();
    let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());

    let output = FeaturePipeline::default()
        .run(df, &StageContext::new(&clock))
        .unwrap();

    let layout = column_names(&output.data).join("\n");
    insta::assert_snapshot!(layout);
}
