//! Pipeline stage identifiers.

use serde::{Deserialize, Serialize};

/// One of the five feature-engineering stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StageKind {
    /// Arithmetic features from existing numeric columns.
    Computed,
    /// Ordinal, one-hot and frequency encodings of text columns.
    Encoded,
    /// Fixed-edge and data-driven range buckets.
    Binned,
    /// Calendar and relative-time features from timestamp columns.
    Time,
    /// Z-score and IQR outlier flags.
    Anomaly,
}

impl StageKind {
    /// All stages in pipeline order.
    pub const ALL: [StageKind; 5] = [
        StageKind::Computed,
        StageKind::Encoded,
        StageKind::Binned,
        StageKind::Time,
        StageKind::Anomaly,
    ];

    /// 1-based position in the pipeline.
    pub fn number(self) -> usize {
        match self {
            Self::Computed => 1,
            Self::Encoded => 2,
            Self::Binned => 3,
            Self::Time => 4,
            Self::Anomaly => 5,
        }
    }

    /// Short name used in intermediate output file names.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Computed => "computed",
            Self::Encoded => "encoded",
            Self::Binned => "binned",
            Self::Time => "time",
            Self::Anomaly => "anomaly",
        }
    }

    /// Human-readable name used in logs and summaries.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Computed => "Derive computed columns",
            Self::Encoded => "Encode categorical features",
            Self::Binned => "Bin numeric ranges",
            Self::Time => "Time-based feature extraction",
            Self::Anomaly => "Flag anomalies",
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}
