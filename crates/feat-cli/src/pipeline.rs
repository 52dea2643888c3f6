//! Per-file execution of the five stages with output persistence.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use feat_model::StageKind;
use feat_output::{final_output_path, stage_output_path, write_csv};
use feat_transform::naming::HAS_ANY_ANOMALY;
use feat_transform::{FeatureFrame, FeaturePipeline, StageContext};
use polars::prelude::DataFrame;
use tracing::{debug, info};

use crate::types::{FileSummary, StageDelta};

/// Where and what to write for each processed file.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
    /// Write `<base>_step{1..4}_<name>.csv` besides the final table.
    pub write_intermediates: bool,
}

/// Load one CSV file, run every stage and persist the results.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a stage fails, or an output
/// cannot be written. Nothing written before the failure is considered valid.
pub fn process_file(
    path: &Path,
    output: &OutputConfig,
    ctx: &StageContext<'_>,
) -> Result<FileSummary> {
    let frame =
        FeatureFrame::from_csv(path).with_context(|| format!("read {}", path.display()))?;
    let FeatureFrame {
        base_name,
        original_columns,
        data,
        ..
    } = frame;
    info!(rows = data.height(), columns = original_columns, "input loaded");

    let mut intermediate_outputs = Vec::new();
    let result = FeaturePipeline::default().run_with(data, ctx, |stage| {
        if output.write_intermediates && stage.report.stage != StageKind::Anomaly {
            let target = stage_output_path(&output.output_dir, &base_name, stage.report.stage);
            write_csv(&mut stage.data, &target)?;
            debug!(path = %target.display(), "intermediate output written");
            intermediate_outputs.push(target);
        }
        Ok(())
    })?;

    let mut data = result.data;
    let final_output = final_output_path(&output.output_dir, &base_name);
    write_csv(&mut data, &final_output)
        .with_context(|| format!("write {}", final_output.display()))?;
    info!(path = %final_output.display(), "final output written");

    let stages = result
        .reports
        .iter()
        .map(|report| StageDelta {
            stage: report.stage,
            columns_before: report.columns_before,
            columns_after: report.columns_after,
            skipped: report.skipped.len(),
        })
        .collect();

    Ok(FileSummary {
        file_name: file_name(path),
        rows: data.height(),
        original_columns,
        final_columns: data.width(),
        stages,
        anomalous_rows: anomalous_rows(&data),
        final_output,
        intermediate_outputs,
    })
}

/// Count rows whose `has_any_anomaly` flag is set.
pub fn anomalous_rows(df: &DataFrame) -> usize {
    df.column(HAS_ANY_ANOMALY)
        .ok()
        .and_then(|column| column.i32().ok())
        .map(|flags| flags.into_iter().filter(|flag| *flag == Some(1)).count())
        .unwrap_or(0)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}
