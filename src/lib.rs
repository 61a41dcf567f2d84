//! Batch evaluation of a trained crop-yield regression model.
//!
//! ```text
//!  model + X_test + y_test
//!        │
//!        ▼
//!   data::loader ─► predict ─► eval ─► report ─► export (optional)
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod export;
pub mod model;
pub mod pipeline;
pub mod predict;
pub mod report;

pub use config::{ConfigOverrides, EvalConfig};
pub use error::{EvalError, EvalResult};
pub use pipeline::{Outcome, run};
