//! Column-derivation and anomaly-detection engine.
//!
//! The pipeline is five append-only stages over a polars [`DataFrame`]:
//! computed columns, categorical encoding, range binning, temporal features
//! and anomaly flags. Each stage keeps every input row and column and only
//! appends. Derivations whose inputs are absent are skipped and recorded in
//! the stage's [`StageReport`](feat_model::StageReport).
//!
//! ```ignore
//! use feat_transform::{FeaturePipeline, StageContext};
//!
//! let output = FeaturePipeline::default().run(df, &StageContext::system())?;
//! ```
//!
//! [`DataFrame`]: polars::prelude::DataFrame

pub mod clock;
pub mod datetime;
pub mod error;
pub mod frame;
pub mod naming;
pub mod pipeline;
pub mod process;
pub mod stage;
pub mod stages;
pub mod stats;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, TransformError};
pub use frame::FeatureFrame;
pub use pipeline::{FeaturePipeline, PipelineOutput};
pub use process::{StageInput, process};
pub use stage::{Stage, StageContext, StageOutput};
pub use stages::{
    AnomalyFlags, BinSpec, CategoricalEncoding, ComputedColumns, RangeBinning, TemporalFeatures,
    stage_for,
};
