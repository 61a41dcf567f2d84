use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{FeatureTable, Table, TargetTable};
use crate::config::ArtifactPaths;
use crate::error::{ArtifactKind, EvalError, EvalResult};
use crate::model::{self, ModelArtifact, Regressor};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Everything one evaluation run needs, loaded together.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub model: ModelArtifact,
    pub features: FeatureTable,
    pub targets: TargetTable,
}

/// Load the model and both tables. Any single failure fails the whole load.
pub fn load_artifacts(paths: &ArtifactPaths) -> EvalResult<Artifacts> {
    let model = model::load_model(&paths.model)?;
    info!(
        "model loaded from {} ({}, {} features)",
        paths.model.display(),
        model.kind_name(),
        model.feature_names().len()
    );

    let features = load_features(&paths.features)?;
    let targets = load_targets(&paths.targets)?;
    let (rows, cols) = features.shape();
    info!("features: {rows} rows x {cols} columns from {}", paths.features.display());
    info!(
        "targets: {} rows ('{}') from {}",
        targets.len(),
        targets.column,
        paths.targets.display()
    );

    Ok(Artifacts {
        model,
        features,
        targets,
    })
}

pub fn load_features(path: &Path) -> EvalResult<FeatureTable> {
    let table = load_checked(path, ArtifactKind::Features)?;
    Ok(FeatureTable::new(table))
}

/// Load the target table; its first column is the yield.
pub fn load_targets(path: &Path) -> EvalResult<TargetTable> {
    let table = load_checked(path, ArtifactKind::Targets)?;
    TargetTable::from_first_column(table).ok_or_else(|| {
        EvalError::malformed(ArtifactKind::Targets, path, "table has no columns")
    })
}

fn load_checked(path: &Path, kind: ArtifactKind) -> EvalResult<Table> {
    if !path.is_file() {
        return Err(EvalError::MissingArtifact {
            kind,
            path: path.to_path_buf(),
        });
    }
    let table = load_file(path).map_err(|e| EvalError::malformed(kind, path, e))?;
    if table.columns.is_empty() {
        return Err(EvalError::malformed(kind, path, "table has no columns"));
    }
    Ok(table)
}

/// Load a numeric table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, numeric cells, empty cell = missing
/// * `.json`    – `[{ "col": 1.0, ... }, ...]`
/// * `.parquet` – numeric columns of any width, nulls = missing
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row = record
            .iter()
            .enumerate()
            .map(|(col_idx, cell)| parse_cell(cell, row_no, &columns[col_idx]))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

fn parse_cell(s: &str, row: usize, col: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .with_context(|| format!("Row {row}, column '{col}': '{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "soil_pH": 6.4, "rainfall_mm": 112.0 },
///   { "soil_pH": 7.0, "rainfall_mm": null }
/// ]
/// ```
///
/// Columns appear in first-seen order; a key missing from a record is a missing value.
/// Records carry the only column names, so an empty array is rejected rather
/// than read as an empty table the way a header-only CSV is.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;
    ensure!(!records.is_empty(), "Empty JSON array has no column names");

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        // Checked to be an object above.
        let Some(obj) = rec.as_object() else { continue };
        let row = columns
            .iter()
            .map(|col| match obj.get(col) {
                None | Some(JsonValue::Null) => Ok(f64::NAN),
                Some(v) => v
                    .as_f64()
                    .with_context(|| format!("Row {i}, column '{col}': not a number")),
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file whose columns are all numeric.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let first_row = rows.len();
        rows.extend((0..batch.num_rows()).map(|_| vec![f64::NAN; columns.len()]));

        for (col_idx, col) in batch.columns().iter().enumerate() {
            let name = &columns[col_idx];
            if !col.data_type().is_numeric() {
                bail!("Column '{name}' has type {:?}, expected a numeric type", col.data_type());
            }
            let as_f64 = cast(col.as_ref(), &DataType::Float64)
                .with_context(|| format!("casting column '{name}' to Float64"))?;
            let values = as_f64.as_primitive::<Float64Type>();
            for row in 0..values.len() {
                if !values.is_null(row) {
                    rows[first_row + row][col_idx] = values.value(row);
                }
            }
        }
    }

    Ok(Table::new(columns, rows))
}
