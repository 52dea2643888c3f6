//! Command handlers for `run` and `generate`.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use feat_cli::pipeline::{OutputConfig, file_name, process_file};
use feat_cli::sample::{DEFAULT_ROWS, DEFAULT_SEED, SAMPLE_FILE_NAME, write_sample};
use feat_cli::types::{FileError, RunResult};
use feat_ingest::{ensure_dir, list_csv_files};
use feat_model::PipelineOptions;
use feat_transform::{Clock, FixedClock, StageContext, SystemClock};
use tracing::{error, info, info_span, warn};

use crate::cli::{GenerateArgs, RunArgs};

pub fn run_generate(args: &GenerateArgs) -> Result<PathBuf> {
    let today = Local::now().date_naive();
    write_sample(&args.output, args.rows, args.seed, today)
        .with_context(|| format!("generate {}", args.output.display()))?;
    Ok(args.output.clone())
}

pub fn run_pipeline(args: &RunArgs) -> Result<RunResult> {
    let start = Instant::now();
    let run_span = info_span!(
        "run",
        input_dir = %args.input_dir.display(),
        output_dir = %args.output_dir.display()
    );
    let _run_guard = run_span.enter();

    ensure_dir(&args.output_dir).context("prepare output directory")?;
    if ensure_dir(&args.input_dir).context("prepare input directory")? {
        info!("created input directory");
    }

    let mut files = list_csv_files(&args.input_dir).context("scan input directory")?;
    let mut generated_sample = None;
    if files.is_empty() || args.generate_sample {
        if files.is_empty() {
            warn!("no CSV files found, generating sample data");
        }
        let path = args.input_dir.join(SAMPLE_FILE_NAME);
        let today = args
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        write_sample(&path, DEFAULT_ROWS, DEFAULT_SEED, today)?;
        generated_sample = Some(path);
        files = list_csv_files(&args.input_dir).context("scan input directory")?;
    }
    info!(count = files.len(), "CSV files found");

    let options = PipelineOptions::default()
        .with_zscore_threshold(args.zscore_threshold)
        .with_iqr_multiplier(args.iqr_multiplier)
        .with_recent_days(args.recent_days)
        .with_intermediates(!args.no_intermediates);
    let fixed_clock = args.reference_date.map(FixedClock::at_date);
    let clock: &dyn Clock = match &fixed_clock {
        Some(clock) => clock,
        None => &SystemClock,
    };
    let ctx = StageContext::new(clock).with_options(options);
    let output = OutputConfig {
        output_dir: args.output_dir.clone(),
        write_intermediates: ctx.options.write_intermediates,
    };

    let mut summaries = Vec::new();
    let mut errors = Vec::new();
    for path in &files {
        let name = file_name(path);
        let file_span = info_span!("file", file = %name);
        let _file_guard = file_span.enter();
        match process_file(path, &output, &ctx) {
            Ok(summary) => {
                info!(
                    rows = summary.rows,
                    added = summary.added_features(),
                    anomalous_rows = summary.anomalous_rows,
                    "file processed"
                );
                summaries.push(summary);
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "file failed");
                errors.push(FileError {
                    file_name: name,
                    message: format!("{err:#}"),
                });
            }
        }
    }

    Ok(RunResult {
        input_dir: args.input_dir.clone(),
        output_dir: args.output_dir.clone(),
        generated_sample,
        files: summaries,
        errors,
        duration: start.elapsed(),
    })
}
