//! Model artifacts: deserialization, validation, and row-wise prediction.
//!
//! ```text
//!   yield_model.json
//!        │  serde, tagged by "kind"
//!        ▼
//!   ┌───────────────┐
//!   │ ModelArtifact │  gradient_boosted_trees | linear
//!   └───────────────┘
//!        │  validate()
//!        ▼
//!   dyn Regressor    feature_names() + predict_row()
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactKind, EvalError, EvalResult};

pub mod linear;
pub mod tree;

pub use linear::LinearModel;
pub use tree::{Node, Tree, TreeEnsemble};

/// A fitted regression function over a fixed, named feature vector.
pub trait Regressor {
    /// Input features, in the order `predict_row` expects them.
    fn feature_names(&self) -> &[String];

    /// Predict one value. `features.len()` equals `feature_names().len()`;
    /// missing inputs are `NaN`.
    fn predict_row(&self, features: &[f64]) -> f64;
}

/// Serialized model, as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    GradientBoostedTrees(TreeEnsemble),
    Linear(LinearModel),
}

impl ModelArtifact {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ModelArtifact::GradientBoostedTrees(_) => "gradient_boosted_trees",
            ModelArtifact::Linear(_) => "linear",
        }
    }

    /// Structural checks that make `predict_row` infallible.
    pub fn validate(&self) -> anyhow::Result<()> {
        let names = self.feature_names();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                anyhow::bail!("duplicate feature name '{name}'");
            }
        }
        match self {
            ModelArtifact::GradientBoostedTrees(m) => m.validate(),
            ModelArtifact::Linear(m) => m.validate(),
        }
    }

    pub fn as_regressor(&self) -> &dyn Regressor {
        match self {
            ModelArtifact::GradientBoostedTrees(m) => m,
            ModelArtifact::Linear(m) => m,
        }
    }
}

impl Regressor for ModelArtifact {
    fn feature_names(&self) -> &[String] {
        self.as_regressor().feature_names()
    }

    fn predict_row(&self, features: &[f64]) -> f64 {
        self.as_regressor().predict_row(features)
    }
}

/// Read, parse and validate a model artifact.
pub fn load_model(path: &Path) -> EvalResult<ModelArtifact> {
    if !path.is_file() {
        return Err(EvalError::MissingArtifact {
            kind: ArtifactKind::Model,
            path: path.to_path_buf(),
        });
    }
    parse_model(path).map_err(|e| EvalError::malformed(ArtifactKind::Model, path, e))
}

fn parse_model(path: &Path) -> anyhow::Result<ModelArtifact> {
    let text = std::fs::read_to_string(path).context("reading model file")?;
    let model: ModelArtifact = serde_json::from_str(&text).context("parsing model JSON")?;
    model.validate().context("validating model")?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn loads_tagged_linear_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("yield_model.json");
        fs::write(
            &path,
            r#"{"kind": "linear", "feature_names": ["soil_pH", "rainfall_mm"],
                "intercept": 100.0, "coefficients": [10.0, 2.0]}"#,
        )
        .unwrap();

        let model = load_model(&path).unwrap();
        assert_eq!(model.kind_name(), "linear");
        assert_eq!(model.predict_row(&[6.0, 50.0]), 260.0);
    }

    #[test]
    fn loads_tree_artifact_with_default_direction() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("yield_model.json");
        fs::write(
            &path,
            r#"{"kind": "gradient_boosted_trees", "feature_names": ["rainfall_mm"],
                "base_score": 0.5,
                "trees": [{"nodes": [
                    {"feature": 0, "threshold": 100.0, "left": 1, "right": 2},
                    {"leaf": -1.0},
                    {"leaf": 1.0}
                ]}]}"#,
        )
        .unwrap();

        let model = load_model(&path).unwrap();
        assert_eq!(model.predict_row(&[50.0]), -0.5);
        assert_eq!(model.predict_row(&[f64::NAN]), -0.5);
    }

    #[test]
    fn unknown_kind_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("yield_model.json");
        fs::write(&path, r#"{"kind": "neural_net", "feature_names": []}"#).unwrap();
        assert!(matches!(
            load_model(&path).unwrap_err(),
            EvalError::MalformedArtifact { kind: ArtifactKind::Model, .. }
        ));
    }

    #[test]
    fn duplicate_feature_names_are_rejected() {
        let model = ModelArtifact::Linear(LinearModel {
            feature_names: vec!["soil_pH".into(), "soil_pH".into()],
            intercept: 0.0,
            coefficients: vec![1.0, 1.0],
        });
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate feature name"));
    }

    #[test]
    fn missing_model_file() {
        let dir = tempdir().unwrap();
        let err = load_model(&dir.path().join("nope.json")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
