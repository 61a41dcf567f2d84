/// Evaluation: compare predictions to ground truth.
///
/// ```text
///  TargetTable + predictions + FeatureTable
///        │
///        ▼
///   ┌───────────┐
///   │  results   │  one PredictionRow per sample, context columns
///   └───────────┘
///        │
///        ├──► metrics   MSE / RMSE / MAE, summary means
///        └──► ranking   top-N by actual yield
/// ```

pub mod metrics;
pub mod ranking;
pub mod results;

pub use metrics::{Metrics, Summary};
pub use ranking::top_n_by_actual;
pub use results::{CONTEXT_FEATURES, ContextFeature, PredictionRow, ResultSet};
