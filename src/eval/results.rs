use log::warn;

use crate::data::model::{FeatureTable, TargetTable};
use crate::error::{EvalError, EvalResult};

// ---------------------------------------------------------------------------
// Context features copied next to each prediction
// ---------------------------------------------------------------------------

/// A feature column echoed into reports when the schema has it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextFeature {
    /// Column name in the feature table and the export.
    pub column: &'static str,
    /// Header in the ranked console table.
    pub label: &'static str,
    pub width: usize,
    pub precision: usize,
}

pub const CONTEXT_FEATURES: [ContextFeature; 5] = [
    ContextFeature { column: "soil_moisture_%", label: "Soil_M%", width: 8, precision: 1 },
    ContextFeature { column: "soil_pH", label: "pH", width: 6, precision: 2 },
    ContextFeature { column: "temperature_C", label: "Temp°C", width: 7, precision: 1 },
    ContextFeature { column: "rainfall_mm", label: "Rain_mm", width: 9, precision: 1 },
    ContextFeature { column: "humidity_%", label: "Humid%", width: 8, precision: 1 },
];

// ---------------------------------------------------------------------------
// PredictionRow / ResultSet
// ---------------------------------------------------------------------------

/// One evaluated sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRow {
    /// Zero-based position in the input tables.
    pub index: usize,
    pub actual: f64,
    pub predicted: f64,
    /// `actual - predicted`
    pub difference: f64,
    /// `difference / actual * 100`; non-finite when `actual == 0`.
    pub percentage_error: f64,
    /// Aligned with [`ResultSet::context_columns`].
    pub context: Vec<f64>,
}

/// All evaluated rows plus the context columns the schema provided.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub rows: Vec<PredictionRow>,
    pub context_columns: Vec<ContextFeature>,
}

impl ResultSet {
    /// Combine truth, predictions and context into one row per sample.
    ///
    /// All three inputs must have the same row count.
    pub fn build(
        targets: &TargetTable,
        predictions: &[f64],
        features: &FeatureTable,
    ) -> EvalResult<Self> {
        check_row_counts(features.len(), targets.len())?;
        check_row_counts(predictions.len(), targets.len())?;

        let context_columns: Vec<ContextFeature> = CONTEXT_FEATURES
            .iter()
            .filter(|f| features.column_index(f.column).is_some())
            .copied()
            .collect();

        let rows: Vec<PredictionRow> = targets
            .values
            .iter()
            .zip(predictions)
            .enumerate()
            .map(|(index, (&actual, &predicted))| {
                let difference = actual - predicted;
                PredictionRow {
                    index,
                    actual,
                    predicted,
                    difference,
                    percentage_error: difference / actual * 100.0,
                    context: context_columns
                        .iter()
                        .filter_map(|f| features.value(index, f.column))
                        .collect(),
                }
            })
            .collect();

        let zero_actuals = rows.iter().filter(|r| r.actual == 0.0).count();
        if zero_actuals > 0 {
            warn!("{zero_actuals} row(s) have an actual yield of 0; their percentage error is not finite");
        }

        Ok(ResultSet {
            rows,
            context_columns,
        })
    }

    /// Value of a context feature for `row`, `None` when the schema lacks it.
    pub fn context_value(&self, row: &PredictionRow, column: &str) -> Option<f64> {
        let pos = self.context_columns.iter().position(|f| f.column == column)?;
        row.context.get(pos).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Fails unless both tables have the same number of rows.
pub fn check_row_counts(features: usize, targets: usize) -> EvalResult<()> {
    if features != targets {
        return Err(EvalError::RowCountMismatch { features, targets });
    }
    Ok(())
}
