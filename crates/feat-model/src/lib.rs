pub mod options;
pub mod report;
pub mod stage;

pub use options::PipelineOptions;
pub use report::{ColumnAnomalyCounts, Skip, SkipReason, StageReport};
pub use stage::StageKind;
