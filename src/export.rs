use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::info;

use crate::error::{EvalError, EvalResult};
use crate::eval::ResultSet;

pub const FIXED_COLUMNS: [&str; 4] = ["actual_yield", "predicted_yield", "difference", "percentage_error"];

/// Write every row of `results` to `path`, replacing any existing file.
///
/// The whole file is rendered in memory first and committed with one write.
/// Returns the number of data rows written.
pub fn save_predictions(results: &ResultSet, path: &Path) -> EvalResult<usize> {
    let output_error = |e: anyhow::Error| EvalError::Output {
        path: path.to_path_buf(),
        source: e.into(),
    };

    let bytes = render_csv(results).map_err(output_error)?;
    std::fs::write(path, bytes)
        .context("writing file")
        .map_err(output_error)?;

    info!("saved {} predictions to {}", results.len(), path.display());
    Ok(results.len())
}

/// Header plus one record per row; non-finite values are written as `inf`/`NaN`.
pub fn render_csv(results: &ResultSet) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = FIXED_COLUMNS
        .iter()
        .copied()
        .chain(results.context_columns.iter().map(|f| f.column));
    writer.write_record(header).context("writing CSV header")?;

    for row in &results.rows {
        let record = [row.actual, row.predicted, row.difference, row.percentage_error]
            .into_iter()
            .chain(row.context.iter().copied())
            .map(|v| v.to_string());
        writer
            .write_record(record)
            .with_context(|| format!("writing CSV row {}", row.index))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV buffer: {}", e.error()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::data::model::{FeatureTable, Table, TargetTable};

    fn results(n: usize) -> ResultSet {
        let targets = TargetTable {
            column: "yield".into(),
            values: (0..n).map(|i| i as f64 * 100.0).collect(),
        };
        let features = FeatureTable::new(Table::new(
            vec!["humidity_%".into(), "soil_moisture_%".into(), "sunlight_hours".into()],
            (0..n).map(|_| vec![60.0, 25.5, 8.0]).collect(),
        ));
        let predictions: Vec<f64> = (0..n).map(|i| i as f64 * 100.0 + 10.0).collect();
        ResultSet::build(&targets, &predictions, &features).unwrap()
    }

    #[test]
    fn header_then_one_line_per_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("predictions_results.csv");
        fs::write(&path, "stale contents\n").unwrap();

        let written = save_predictions(&results(25), &path).unwrap();
        assert_eq!(written, 25);

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 26);
        assert_eq!(
            lines[0],
            "actual_yield,predicted_yield,difference,percentage_error,soil_moisture_%,humidity_%"
        );
        assert_eq!(lines[2], "100,110,-10,-10,25.5,60");
    }

    #[test]
    fn zero_actual_is_written_verbatim() {
        let text = String::from_utf8(render_csv(&results(1)).unwrap()).unwrap();
        assert_eq!(text.lines().nth(1), Some("0,10,-10,-inf,25.5,60"));
    }

    #[test]
    fn unwritable_path_is_an_output_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("out.csv");
        let err = save_predictions(&results(2), &path).unwrap_err();
        assert!(matches!(err, EvalError::Output { .. }));
        assert_eq!(err.exit_code(), 7);
    }
}
