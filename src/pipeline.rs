//! One evaluation run: load → predict → evaluate → report → (export).
//!
//! Each stage finishes before the next starts. Load, prediction and
//! row-count failures abort before anything is printed or written; an export
//! failure is reported after the console report is complete.

use std::io::{self, Write};
use std::path::PathBuf;

use log::info;

use crate::config::EvalConfig;
use crate::data::loader::load_artifacts;
use crate::error::{EvalError, EvalResult};
use crate::eval::results::check_row_counts;
use crate::eval::{Metrics, ResultSet, Summary, top_n_by_actual};
use crate::export::save_predictions;
use crate::predict::predict;
use crate::report;

/// What a successful run computed.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub metrics: Metrics,
    pub summary: Summary,
    pub results: ResultSet,
    /// Positions into `results.rows`, best first.
    pub ranked: Vec<usize>,
    /// Export location, when one was written.
    pub exported: Option<PathBuf>,
}

pub fn run<W: Write>(cfg: &EvalConfig, out: &mut W) -> EvalResult<Outcome> {
    info!("base directory: {}", cfg.base_dir.display());

    let artifacts = load_artifacts(&cfg.artifact_paths())?;
    check_row_counts(artifacts.features.len(), artifacts.targets.len())?;

    let predictions = predict(&artifacts.model, &artifacts.features)?;
    let metrics = Metrics::compute(&artifacts.targets.values, &predictions)?;
    let results = ResultSet::build(&artifacts.targets, &predictions, &artifacts.features)?;
    let summary = Summary::compute(&results);
    let ranked = top_n_by_actual(&results.rows, cfg.top_n);

    write_report(out, cfg, &metrics, &results, &ranked, &summary).map_err(console_error)?;

    let exported = if cfg.show_data {
        let path = cfg.output_path();
        save_predictions(&results, &path)?;
        writeln!(out, "\nDetailed results saved to {}", path.display()).map_err(console_error)?;
        Some(path)
    } else {
        writeln!(out, "\nUse --show-data to save detailed results to CSV").map_err(console_error)?;
        None
    };
    writeln!(out, "\nPrediction pipeline completed successfully!").map_err(console_error)?;

    Ok(Outcome {
        metrics,
        summary,
        results,
        ranked,
        exported,
    })
}

fn write_report<W: Write>(
    out: &mut W,
    cfg: &EvalConfig,
    metrics: &Metrics,
    results: &ResultSet,
    ranked: &[usize],
    summary: &Summary,
) -> io::Result<()> {
    writeln!(out, "Crop Yield Prediction - Model Evaluation")?;
    writeln!(out, "{}", "=".repeat(50))?;
    report::write_metrics(out, metrics)?;
    report::write_top_table(out, results, ranked, cfg.top_n)?;
    report::write_summary(out, summary)?;
    out.flush()
}

fn console_error(e: io::Error) -> EvalError {
    EvalError::Output {
        path: PathBuf::from("<stdout>"),
        source: e.into(),
    }
}
