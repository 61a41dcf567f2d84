//! Run configuration: built-in defaults, an optional JSON file, then
//! command-line overrides. Relative file names resolve against `base_dir`;
//! the process working directory is never touched.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult};

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    pub base_dir: PathBuf,
    pub model_file: PathBuf,
    pub features_file: PathBuf,
    pub targets_file: PathBuf,
    pub output_file: PathBuf,
    /// Rows shown in the ranked table.
    pub top_n: usize,
    /// Write the row-level export.
    pub show_data: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            model_file: PathBuf::from("yield_model.json"),
            features_file: PathBuf::from("X_test.csv"),
            targets_file: PathBuf::from("y_test.csv"),
            output_file: PathBuf::from("predictions_results.csv"),
            top_n: 10,
            show_data: false,
        }
    }
}

/// Values given on the command line; `None` keeps the lower layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_dir: Option<PathBuf>,
    pub model_file: Option<PathBuf>,
    pub features_file: Option<PathBuf>,
    pub targets_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub top_n: Option<usize>,
    pub show_data: bool,
}

/// Resolved input locations.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub features: PathBuf,
    pub targets: PathBuf,
}

impl EvalConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> EvalResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            EvalError::Config(format!("reading {}: {e}", path.display()))
        })?;
        serde_json::from_str(&text)
            .map_err(|e| EvalError::Config(format!("parsing {}: {e}", path.display())))
    }

    /// Defaults, then `config_file` if given, then `overrides`; validated.
    pub fn layered(config_file: Option<&Path>, overrides: ConfigOverrides) -> EvalResult<Self> {
        let mut cfg = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        cfg.apply(overrides);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(v) = overrides.base_dir {
            self.base_dir = v;
        }
        if let Some(v) = overrides.model_file {
            self.model_file = v;
        }
        if let Some(v) = overrides.features_file {
            self.features_file = v;
        }
        if let Some(v) = overrides.targets_file {
            self.targets_file = v;
        }
        if let Some(v) = overrides.output_file {
            self.output_file = v;
        }
        if let Some(v) = overrides.top_n {
            self.top_n = v;
        }
        self.show_data |= overrides.show_data;
    }

    pub fn validate(&self) -> EvalResult<()> {
        if self.top_n == 0 {
            return Err(EvalError::Config("top_n must be at least 1".into()));
        }
        Ok(())
    }

    /// `name` joined onto `base_dir` unless it is already absolute.
    pub fn resolve(&self, name: &Path) -> PathBuf {
        self.base_dir.join(name)
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.resolve(&self.model_file),
            features: self.resolve(&self.features_file),
            targets: self.resolve(&self.targets_file),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_file)
    }
}
