/// Data layer: table types and loading.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────────────┐
///   │ FeatureTable / TargetTable │  named columns, NaN = missing
///   └──────────────────────────┘
/// ```

pub mod loader;
pub mod model;
