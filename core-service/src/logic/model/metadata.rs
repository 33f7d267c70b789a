//! Model metadata (`metadata.json`)
//!
//! Optional. Written by the training pipeline; unknown keys are ignored.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelParams {
    /// Per-model blend weight, overrides the deployment default
    #[serde(default)]
    pub alpha: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub params: ModelParams,
    /// Training dataset, reused as the severity reference corpus
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
    /// CRC32 of the vectorizer vocabulary the classifier was trained against
    #[serde(default)]
    pub vectorizer_fingerprint: Option<u32>,
    #[serde(default)]
    pub n_features: Option<usize>,
}

impl ModelMetadata {
    /// Usable alpha from the metadata, if any
    pub fn alpha(&self) -> Option<f64> {
        self.params
            .alpha
            .filter(|a| a.is_finite() && (0.0..=1.0).contains(a))
    }
}
