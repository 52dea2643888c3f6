//! Ordered stage execution.
//!
//! # Standard pipeline order
//!
//! 1. **ComputedColumns** - arithmetic features from numeric columns
//! 2. **CategoricalEncoding** - ordinal, one-hot and frequency encodings
//! 3. **RangeBinning** - fixed and data-driven bins
//! 4. **TemporalFeatures** - calendar and relative-time features
//! 5. **AnomalyFlags** - Z-score and IQR outlier flags
//!
//! Every stage consumes the full output of its predecessor.

use feat_model::{StageKind, StageReport};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use crate::error::Result;
use crate::stage::{Stage, StageContext, StageOutput};
use crate::stages::stage_for;

/// Final table plus one report per executed stage.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub data: DataFrame,
    pub reports: Vec<StageReport>,
}

impl PipelineOutput {
    /// Total number of columns appended by all stages.
    pub fn columns_added(&self) -> usize {
        self.reports.iter().map(StageReport::columns_added).sum()
    }

    pub fn report(&self, stage: StageKind) -> Option<&StageReport> {
        self.reports.iter().find(|r| r.stage == stage)
    }
}

/// An ordered sequence of stages.
pub struct FeaturePipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Default for FeaturePipeline {
    /// The five stages in their standard order.
    fn default() -> Self {
        StageKind::ALL
            .into_iter()
            .fold(Self::new(), |pipeline, kind| pipeline.add_stage(stage_for(kind)))
    }
}

impl FeaturePipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Stage kinds in execution order.
    pub fn stage_kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|s| s.kind()).collect()
    }

    /// Run every stage in order.
    pub fn run(&self, df: DataFrame, ctx: &StageContext<'_>) -> Result<PipelineOutput> {
        self.run_with(df, ctx, |_| Ok(()))
    }

    /// Run every stage in order, handing each stage's output to `on_stage`
    /// before the next stage starts.
    ///
    /// # Errors
    ///
    /// Stops at the first stage or callback error.
    pub fn run_with<F>(
        &self,
        df: DataFrame,
        ctx: &StageContext<'_>,
        mut on_stage: F,
    ) -> Result<PipelineOutput>
    where
        F: FnMut(&mut StageOutput) -> Result<()>,
    {
        let mut data = df;
        let mut reports = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let kind = stage.kind();
            let span = info_span!("stage", number = kind.number(), name = kind.slug());
            let _guard = span.enter();

            let mut output = stage.apply(&data, ctx)?;
            info!(
                rows = output.report.rows,
                columns_before = output.report.columns_before,
                columns_after = output.report.columns_after,
                added = output.report.columns_added(),
                "{} complete",
                kind.display_name()
            );
            on_stage(&mut output)?;

            data = output.data;
            reports.push(output.report);
        }

        Ok(PipelineOutput { data, reports })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::ComputedColumns;
    use polars::prelude::Column;

    #[test]
    fn test_default_order() {
        assert_eq!(FeaturePipeline::default().stage_kinds(), StageKind::ALL.to_vec());
    }

    #[test]
    fn test_callback_sees_every_stage() {
        let df = DataFrame::new(vec![Column::new("age".into(), vec![30i64, 45])]).unwrap();
        let mut seen = Vec::new();

        let output = FeaturePipeline::default()
            .run_with(df, &StageContext::system(), |out| {
                seen.push(out.report.stage);
                Ok(())
            })
            .unwrap();

        assert_eq!(seen, StageKind::ALL.to_vec());
        assert_eq!(output.reports.len(), 5);
        assert_eq!(output.data.height(), 2);
        assert!(output.data.column("age_squared").is_ok());
        assert!(output.data.column("age_group").is_ok());
    }

    #[test]
    fn test_custom_pipeline() {
        let df = DataFrame::new(vec![Column::new("age".into(), vec![3i64])]).unwrap();
        let pipeline = FeaturePipeline::new().add_stage(Box::new(ComputedColumns));

        let output = pipeline.run(df, &StageContext::system()).unwrap();

        assert_eq!(output.columns_added(), 1);
        assert!(output.report(StageKind::Anomaly).is_none());
    }
}
