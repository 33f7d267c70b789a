//! Error taxonomy
//!
//! Gating outcomes are NOT errors. They are successful verdicts carrying a
//! sentinel risk level. Only the three failure classes below exist.

use std::path::{Path, PathBuf};

pub type RiskResult<T> = Result<T, RiskError>;

#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// Missing or malformed caller input, rejected before the pipeline runs
    #[error("invalid input: {0}")]
    Input(String),

    /// Model artifact missing or corrupt. Fatal to the request.
    #[error("failed to load model artifact {}: {reason}", path.display())]
    ModelLoad {
        path: PathBuf,
        reason: String,
        not_found: bool,
    },

    /// Similarity computation failure. Recovered inside the pipeline.
    #[error("severity estimation failed: {0}")]
    Estimation(String),
}

impl RiskError {
    pub fn input(msg: impl Into<String>) -> Self {
        RiskError::Input(msg.into())
    }

    pub fn model_load(path: &Path, reason: impl Into<String>) -> Self {
        RiskError::ModelLoad {
            path: path.to_path_buf(),
            reason: reason.into(),
            not_found: false,
        }
    }

    pub fn model_not_found(path: &Path) -> Self {
        RiskError::ModelLoad {
            path: path.to_path_buf(),
            reason: "file not found".to_string(),
            not_found: true,
        }
    }

    /// True when a model artifact simply does not exist (maps to 404 upstream)
    pub fn is_not_found(&self) -> bool {
        matches!(self, RiskError::ModelLoad { not_found: true, .. })
    }
}
