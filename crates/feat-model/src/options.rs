//! Configuration options for a pipeline run.

use serde::{Deserialize, Serialize};

/// Options controlling stage behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Absolute standardized deviation above which a value is a Z-score outlier.
    pub zscore_threshold: f64,

    /// Multiplier applied to the IQR to build the Tukey fences.
    pub iqr_multiplier: f64,

    /// A timestamp at most this many days before "now" is recent.
    pub recent_days: i64,

    /// Persist the output of stages 1-4 next to the final table.
    pub write_intermediates: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            zscore_threshold: 3.0,
            iqr_multiplier: 1.5,
            recent_days: 30,
            write_intermediates: true,
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zscore_threshold(mut self, threshold: f64) -> Self {
        self.zscore_threshold = threshold;
        self
    }

    pub fn with_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = multiplier;
        self
    }

    pub fn with_recent_days(mut self, days: i64) -> Self {
        self.recent_days = days;
        self
    }

    pub fn with_intermediates(mut self, enable: bool) -> Self {
        self.write_intermediates = enable;
        self
    }
}
