//! Names of every derived column.
//!
//! Column names are built here and nowhere else, so each feature family has
//! one naming function and the full set of temporal features is enumerable.

/// Per-row count of anomaly flags.
pub const ANOMALY_SCORE: &str = "anomaly_score";

/// Per-row indicator, 1 when [`ANOMALY_SCORE`] is positive.
pub const HAS_ANY_ANOMALY: &str = "has_any_anomaly";

/// Ordinal encoding of `source`.
pub fn ordinal_column(source: &str) -> String {
    format!("{source}_encoded")
}

/// Indicator column of `source` for one observed `value`.
pub fn one_hot_column(source: &str, value: &str) -> String {
    format!("{source}_{value}")
}

/// Frequency encoding of `source`.
pub fn frequency_column(source: &str) -> String {
    format!("{source}_freq")
}

/// Z-score flag of a checked column.
pub fn zscore_flag_column(source: &str) -> String {
    format!("{source}_anomaly_zscore")
}

/// IQR flag of a checked column.
pub fn iqr_flag_column(source: &str) -> String {
    format!("{source}_anomaly_iqr")
}

/// Combined (OR) flag of a checked column.
pub fn anomaly_flag_column(source: &str) -> String {
    format!("{source}_is_anomaly")
}

/// A feature derived from one timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalFeature {
    Year,
    Month,
    MonthName,
    Day,
    DayOfWeek,
    DayName,
    Quarter,
    WeekOfYear,
    IsWeekend,
    IsMonthStart,
    IsMonthEnd,
    DaysSinceEpoch,
    Season,
    DaysFromToday,
    IsRecent,
}

impl TemporalFeature {
    /// All features in output order.
    pub const ALL: [TemporalFeature; 15] = [
        TemporalFeature::Year,
        TemporalFeature::Month,
        TemporalFeature::MonthName,
        TemporalFeature::Day,
        TemporalFeature::DayOfWeek,
        TemporalFeature::DayName,
        TemporalFeature::Quarter,
        TemporalFeature::WeekOfYear,
        TemporalFeature::IsWeekend,
        TemporalFeature::IsMonthStart,
        TemporalFeature::IsMonthEnd,
        TemporalFeature::DaysSinceEpoch,
        TemporalFeature::Season,
        TemporalFeature::DaysFromToday,
        TemporalFeature::IsRecent,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::MonthName => "month_name",
            Self::Day => "day",
            Self::DayOfWeek => "day_of_week",
            Self::DayName => "day_name",
            Self::Quarter => "quarter",
            Self::WeekOfYear => "week_of_year",
            Self::IsWeekend => "is_weekend",
            Self::IsMonthStart => "is_month_start",
            Self::IsMonthEnd => "is_month_end",
            Self::DaysSinceEpoch => "days_since_epoch",
            Self::Season => "season",
            Self::DaysFromToday => "days_from_today",
            Self::IsRecent => "is_recent",
        }
    }

    /// Column name of this feature for timestamp column `source`.
    pub fn column_name(self, source: &str) -> String {
        format!("{source}_{}", self.suffix())
    }
}
