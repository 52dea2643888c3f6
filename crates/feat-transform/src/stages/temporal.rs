//! Stage 4: temporal feature extraction.
//!
//! A column is a timestamp candidate when its name mentions "date" or "time"
//! and every present value parses. Candidates are expanded into the fifteen
//! [`TemporalFeature`]s; candidates that fail to parse are left untouched.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use feat_common::column_strings;
use feat_model::{SkipReason, StageKind, StageReport};
use polars::prelude::*;
use tracing::info;

use crate::datetime::{all_timestamps, parse_timestamp};
use crate::error::Result;
use crate::naming::TemporalFeature;
use crate::stage::{Stage, StageContext, StageOutput, append_column, begin_report, skip};

const SECONDS_PER_DAY: i64 = 86_400;

/// Returns true if the column name suggests a date or time.
pub fn is_temporal_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("date") || lower.contains("time")
}

/// Northern-hemisphere meteorological season of a month (1-12).
pub fn season(month: u32) -> &'static str {
    match month {
        12 | 1 | 2 => "Winter",
        3..=5 => "Spring",
        6..=8 => "Summer",
        _ => "Fall",
    }
}

/// Whole days from `from` to `to`, rounded toward negative infinity.
pub fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_seconds().div_euclid(SECONDS_PER_DAY)
}

fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().is_none_or(|next| next.month() != date.month())
}

fn unix_epoch() -> NaiveDateTime {
    DateTime::<Utc>::UNIX_EPOCH.naive_utc()
}

/// Values for one timestamp column.
struct Expansion<'a> {
    source: &'a str,
    stamps: Vec<Option<NaiveDateTime>>,
    now: NaiveDateTime,
    recent_days: i64,
}

impl Expansion<'_> {
    fn ints(&self, name: String, f: impl Fn(NaiveDateTime) -> i32) -> Column {
        let values: Vec<Option<i32>> = self.stamps.iter().map(|s| s.map(&f)).collect();
        Column::new(name.into(), values)
    }

    fn days(&self, name: String, f: impl Fn(NaiveDateTime) -> i64) -> Column {
        let values: Vec<Option<i64>> = self.stamps.iter().map(|s| s.map(&f)).collect();
        Column::new(name.into(), values)
    }

    fn texts(&self, name: String, f: impl Fn(NaiveDateTime) -> String) -> Column {
        let values: Vec<Option<String>> = self.stamps.iter().map(|s| s.map(&f)).collect();
        Column::new(name.into(), values)
    }

    fn column(&self, feature: TemporalFeature) -> Column {
        let name = feature.column_name(self.source);
        let now = self.now;
        let recent_days = self.recent_days;
        match feature {
            TemporalFeature::Year => self.ints(name, |dt| dt.year()),
            TemporalFeature::Month => self.ints(name, |dt| dt.month() as i32),
            TemporalFeature::MonthName => self.texts(name, |dt| dt.format("%B").to_string()),
            TemporalFeature::Day => self.ints(name, |dt| dt.day() as i32),
            TemporalFeature::DayOfWeek => {
                self.ints(name, |dt| dt.weekday().num_days_from_monday() as i32)
            }
            TemporalFeature::DayName => self.texts(name, |dt| dt.format("%A").to_string()),
            TemporalFeature::Quarter => self.ints(name, |dt| ((dt.month() - 1) / 3 + 1) as i32),
            TemporalFeature::WeekOfYear => self.ints(name, |dt| dt.iso_week().week() as i32),
            TemporalFeature::IsWeekend => {
                self.ints(name, |dt| i32::from(dt.weekday().num_days_from_monday() >= 5))
            }
            TemporalFeature::IsMonthStart => self.ints(name, |dt| i32::from(dt.day() == 1)),
            TemporalFeature::IsMonthEnd => self.ints(name, |dt| i32::from(is_month_end(dt.date()))),
            TemporalFeature::DaysSinceEpoch => self.days(name, |dt| days_between(unix_epoch(), dt)),
            TemporalFeature::Season => self.texts(name, |dt| season(dt.month()).to_string()),
            TemporalFeature::DaysFromToday => self.days(name, |dt| days_between(dt, now)),
            TemporalFeature::IsRecent => {
                self.ints(name, |dt| i32::from(days_between(dt, now) <= recent_days))
            }
        }
    }
}

/// Parse candidate columns, returning the ones that are fully temporal.
fn detect(
    df: &DataFrame,
    report: &mut StageReport,
) -> Result<Vec<(String, Vec<Option<NaiveDateTime>>)>> {
    let mut detected = Vec::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if !is_temporal_name(name) {
            continue;
        }
        if !matches!(
            column.dtype(),
            DataType::String | DataType::Date | DataType::Datetime(_, _)
        ) {
            skip(report, name, SkipReason::NotTemporal(name.to_string()));
            continue;
        }
        let values = column_strings(df, name)?;
        if !all_timestamps(&values) {
            skip(report, name, SkipReason::NotTemporal(name.to_string()));
            continue;
        }
        let stamps = values
            .iter()
            .map(|v| v.as_deref().and_then(parse_timestamp))
            .collect();
        detected.push((name.to_string(), stamps));
    }
    Ok(detected)
}

/// Stage 4 of the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalFeatures;

impl Stage for TemporalFeatures {
    fn kind(&self) -> StageKind {
        StageKind::Time
    }

    fn apply(&self, df: &DataFrame, ctx: &StageContext<'_>) -> Result<StageOutput> {
        let mut data = df.clone();
        let mut report = begin_report(self.kind(), df);
        let detected = detect(df, &mut report)?;
        let now = ctx.clock.now();
        info!(
            columns = ?detected.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            "datetime columns detected"
        );

        for (source, stamps) in detected {
            let expansion = Expansion {
                source: &source,
                stamps,
                now,
                recent_days: ctx.options.recent_days,
            };
            for feature in TemporalFeature::ALL {
                append_column(&mut data, &mut report, expansion.column(feature))?;
            }
            report.detected.push(source);
        }

        report.finish(data.width());
        info!(
            created = report.added.len(),
            skipped = report.skipped.len(),
            "temporal features extracted"
        );
        Ok(StageOutput { data, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn run(df: &DataFrame, today: NaiveDate) -> StageOutput {
        let clock = FixedClock::at_date(today);
        let ctx = StageContext::new(&clock);
        TemporalFeatures.apply(df, &ctx).unwrap()
    }

    fn int(df: &DataFrame, name: &str) -> Option<i32> {
        df.column(name).unwrap().i32().unwrap().get(0)
    }

    fn text<'a>(df: &'a DataFrame, name: &str) -> Option<&'a str> {
        df.column(name).unwrap().str().unwrap().get(0)
    }

    #[test]
    fn test_season() {
        assert_eq!(season(1), "Winter");
        assert_eq!(season(3), "Spring");
        assert_eq!(season(8), "Summer");
        assert_eq!(season(11), "Fall");
        assert_eq!(season(12), "Winter");
    }

    #[test]
    fn test_days_between_floors() {
        let start = parse_timestamp("2024-03-15T12:00:00").unwrap();
        let end = parse_timestamp("2024-03-16").unwrap();
        assert_eq!(days_between(start, end), 0);
        assert_eq!(days_between(end, start), -1);
    }

    #[test]
    fn test_friday_in_march() {
        let df = DataFrame::new(vec![Column::new("purchase_date".into(), vec!["2024-03-15"])])
            .unwrap();

        let out = run(&df, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());

        assert_eq!(int(&out.data, "purchase_date_year"), Some(2024));
        assert_eq!(int(&out.data, "purchase_date_month"), Some(3));
        assert_eq!(int(&out.data, "purchase_date_quarter"), Some(1));
        assert_eq!(int(&out.data, "purchase_date_day_of_week"), Some(4));
        assert_eq!(text(&out.data, "purchase_date_day_name"), Some("Friday"));
        assert_eq!(text(&out.data, "purchase_date_month_name"), Some("March"));
        assert_eq!(text(&out.data, "purchase_date_season"), Some("Spring"));
        assert_eq!(int(&out.data, "purchase_date_is_weekend"), Some(0));
        assert_eq!(int(&out.data, "purchase_date_week_of_year"), Some(11));
        assert_eq!(int(&out.data, "purchase_date_is_recent"), Some(1));
        let since_epoch = out.data.column("purchase_date_days_since_epoch").unwrap();
        assert_eq!(since_epoch.i64().unwrap().get(0), Some(19797));
        let from_today = out.data.column("purchase_date_days_from_today").unwrap();
        assert_eq!(from_today.i64().unwrap().get(0), Some(17));
        assert_eq!(out.report.added.len(), TemporalFeature::ALL.len());
    }

    #[test]
    fn test_month_boundaries() {
        let df = DataFrame::new(vec![Column::new("order_time".into(), vec!["2024-02-29 23:10:00"])])
            .unwrap();

        let out = run(&df, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        assert_eq!(int(&out.data, "order_time_is_month_end"), Some(1));
        assert_eq!(int(&out.data, "order_time_is_month_start"), Some(0));
        assert_eq!(int(&out.data, "order_time_is_recent"), Some(0));
    }

    #[test]
    fn test_recent_window_is_inclusive() {
        let df = DataFrame::new(vec![Column::new(
            "visit_date".into(),
            vec!["2024-05-02", "2024-05-01", "2024-06-15"],
        )])
        .unwrap();

        let out = run(&df, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        let days = out.data.column("visit_date_days_from_today").unwrap().i64().unwrap();
        assert_eq!(days.get(0), Some(30));
        assert_eq!(days.get(1), Some(31));
        assert_eq!(days.get(2), Some(-14));
        let recent = out.data.column("visit_date_is_recent").unwrap().i32().unwrap();
        assert_eq!(recent.get(0), Some(1));
        assert_eq!(recent.get(1), Some(0));
        assert_eq!(recent.get(2), Some(1));
    }

    #[test]
    fn test_unparseable_column_is_skipped() {
        let df = DataFrame::new(vec![
            Column::new("update_note".into(), vec!["yesterday"]),
            Column::new("notes".into(), vec!["2024-01-01"]),
        ])
        .unwrap();

        let out = run(&df, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        assert_eq!(out.data.width(), 2);
        assert_eq!(
            out.report.skipped[0].reason,
            SkipReason::NotTemporal("update_note".into())
        );
    }

    #[test]
    fn test_null_timestamp_gives_null_features() {
        let df = DataFrame::new(vec![Column::new(
            "signup_date".into(),
            vec![Some("2024-01-06"), None],
        )])
        .unwrap();

        let out = run(&df, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        let weekend = out.data.column("signup_date_is_weekend").unwrap().i32().unwrap();
        assert_eq!(weekend.get(0), Some(1));
        assert_eq!(weekend.get(1), None);
    }
}
