//! The five pipeline stages in execution order.

mod anomaly;
mod binning;
mod computed;
mod encoding;
mod temporal;

pub use anomaly::{AnomalyFlags, PRIORITY_COLUMNS, iqr_fences, iqr_flags, zscore_flags};
pub use binning::{
    BIN_RULES, BinRule, BinSpec, BinStrategy, RangeBinning, age_bins, discount_bins,
    equal_width_bins, income_bins, purchase_bins, quantile_bins, rating_bins,
};
pub use computed::{ComputedColumns, DERIVATIONS, Derivation};
pub use encoding::{
    CategoricalEncoding, EDUCATION_LEVELS, Encoding, ONE_HOT_COLUMNS, categorical_columns,
    education_rank,
};
pub use temporal::{TemporalFeatures, days_between, is_temporal_name, season};

use feat_model::StageKind;

use crate::stage::Stage;

/// Construct the stage implementing `kind`.
pub fn stage_for(kind: StageKind) -> Box<dyn Stage> {
    match kind {
        StageKind::Computed => Box::new(ComputedColumns),
        StageKind::Encoded => Box::new(CategoricalEncoding),
        StageKind::Binned => Box::new(RangeBinning),
        StageKind::Time => Box::new(TemporalFeatures),
        StageKind::Anomaly => Box::new(AnomalyFlags),
    }
}
