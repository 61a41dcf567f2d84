use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Boxed cause carried by the load and export variants.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// ArtifactKind – which input file a load error refers to
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Features,
    Targets,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Model => write!(f, "model artifact"),
            ArtifactKind::Features => write!(f, "feature table"),
            ArtifactKind::Targets => write!(f, "target table"),
        }
    }
}

// ---------------------------------------------------------------------------
// EvalError – one variant per failure class of the pipeline
// ---------------------------------------------------------------------------

/// Typed failure of a pipeline stage.
///
/// Degenerate metric values (empty dataset, zero actual yield) are not
/// errors: they propagate as non-finite numbers into the report.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("could not find {kind} at {}", path.display())]
    MissingArtifact { kind: ArtifactKind, path: PathBuf },

    #[error("could not load {kind} from {}", path.display())]
    MalformedArtifact {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: Cause,
    },

    #[error("prediction failed: {0}")]
    Inference(String),

    #[error("feature table has {features} rows but target table has {targets}")]
    RowCountMismatch { features: usize, targets: usize },

    #[error("could not write predictions to {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: Cause,
    },
}

pub type EvalResult<T> = Result<T, EvalError>;

impl EvalError {
    pub fn malformed(kind: ArtifactKind, path: impl Into<PathBuf>, source: impl Into<Cause>) -> Self {
        EvalError::MalformedArtifact {
            kind,
            path: path.into(),
            source: source.into(),
        }
    }

    /// The message followed by each underlying cause, `": "`-separated.
    pub fn diagnostic(&self) -> String {
        let mut text = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            text.push_str(": ");
            text.push_str(&err.to_string());
            cause = err.source();
        }
        text
    }

    /// Process exit status for this failure class.
    ///
    /// 1 is left to panics and 2 to command-line usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            EvalError::MissingArtifact { .. } => 3,
            EvalError::MalformedArtifact { .. } => 4,
            EvalError::Inference(_) => 5,
            EvalError::RowCountMismatch { .. } => 6,
            EvalError::Output { .. } => 7,
            EvalError::Config(_) => 8,
        }
    }
}
