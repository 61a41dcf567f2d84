//! Console report: metrics block, ranked table, summary means.
//!
//! Everything renders into an `io::Write` so the binary can target stdout
//! and tests can target a buffer.

use std::io::{self, Write};

use crate::eval::{CONTEXT_FEATURES, Metrics, ResultSet, Summary};

const METRICS_RULE: usize = 40;
const TABLE_RULE: usize = 120;

pub fn write_metrics<W: Write>(out: &mut W, metrics: &Metrics) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Model Performance Metrics:")?;
    writeln!(out, "{}", "=".repeat(METRICS_RULE))?;
    writeln!(out, "{metrics}")?;
    writeln!(out, "{}", "=".repeat(METRICS_RULE))
}

/// Ranked table of `ranked` (row positions into `results`), numbered from 1.
///
/// Context columns the feature schema lacks render as blank cells.
pub fn write_top_table<W: Write>(
    out: &mut W,
    results: &ResultSet,
    ranked: &[usize],
    top_n: usize,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Top {top_n} Highest Yield Predictions:")?;
    writeln!(out, "{}", "=".repeat(TABLE_RULE))?;

    write!(
        out,
        "{:<3} {:<8} {:<10} {:<8} {:<8}",
        "#", "Actual", "Predicted", "Error", "Error%"
    )?;
    for f in &CONTEXT_FEATURES {
        write!(out, " {:<w$}", f.label, w = f.width)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(TABLE_RULE))?;

    for (rank, &idx) in ranked.iter().enumerate() {
        let row = &results.rows[idx];
        write!(
            out,
            "{:<3} {:<8.1} {:<10.1} {:<8.1} {:<8.1}",
            rank + 1,
            row.actual,
            row.predicted,
            row.difference.abs(),
            row.percentage_error.abs()
        )?;
        for f in &CONTEXT_FEATURES {
            match results.context_value(row, f.column) {
                Some(v) => write!(out, " {:<w$.p$}", v, w = f.width, p = f.precision)?,
                None => write!(out, " {:<w$}", "", w = f.width)?,
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", "=".repeat(TABLE_RULE))
}

pub fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Prediction Summary:")?;
    writeln!(out, "   - Average Actual Yield:     {:.2} kg/hectare", summary.mean_actual)?;
    writeln!(out, "   - Average Predicted Yield:  {:.2} kg/hectare", summary.mean_predicted)?;
    writeln!(out, "   - Average Absolute Error:   {:.2} kg/hectare", summary.mean_abs_error)?;
    writeln!(
        out,
        "   - Average Percentage Error: {:.2}%",
        summary.mean_abs_percentage_error
    )
}
