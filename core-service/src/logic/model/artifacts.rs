//! Model Artifacts - Loading & Validation
//!
//! A model directory holds `model.json` (classifier), `vectorizer.json`
//! (fitted TF-IDF) and an optional `metadata.json`. The reference corpus is
//! located through `metadata.dataset_path` and indexed once at load time.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::constants::{METADATA_FILE, MODEL_FILE, VECTORIZER_FILE};
use crate::logic::error::{RiskError, RiskResult};
use crate::logic::features::{TfidfVectorizer, Vectorizer};

use super::classifier::{Classifier, LogisticClassifier};
use super::corpus::{IndexedCorpus, ReferenceCorpus};
use super::metadata::ModelMetadata;

// ============================================================================
// PATH RESOLUTION
// ============================================================================

/// Resolve a caller-supplied model path.
///
/// Existing dir -> itself, existing file -> its parent, otherwise
/// `models_dir/path` when that exists. Anything else is returned unchanged
/// so the subsequent load reports which file is missing.
pub fn resolve_model_dir(models_dir: &Path, model_path: &str) -> RiskResult<PathBuf> {
    if model_path.trim().is_empty() {
        return Err(RiskError::input("model_path is required"));
    }

    let direct = PathBuf::from(model_path);
    if let Some(dir) = existing_dir(&direct) {
        return Ok(dir);
    }

    let nested = models_dir.join(model_path);
    if let Some(dir) = existing_dir(&nested) {
        return Ok(dir);
    }

    Ok(direct)
}

fn existing_dir(path: &Path) -> Option<PathBuf> {
    if path.is_dir() {
        Some(path.to_path_buf())
    } else if path.is_file() {
        path.parent().map(Path::to_path_buf)
    } else {
        None
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> RiskResult<T> {
    if !path.exists() {
        return Err(RiskError::model_not_found(path));
    }
    let data = fs::read(path).map_err(|e| RiskError::model_load(path, e.to_string()))?;
    serde_json::from_slice(&data).map_err(|e| RiskError::model_load(path, e.to_string()))
}

// ============================================================================
// MODEL BUNDLE
// ============================================================================

/// Everything the pipeline needs from a trained model. Read-only once built.
pub struct ModelBundle {
    model_dir: PathBuf,
    classifier: Box<dyn Classifier>,
    vectorizer: Box<dyn Vectorizer>,
    corpus: Option<IndexedCorpus>,
    metadata: ModelMetadata,
}

impl ModelBundle {
    /// Assemble a bundle, rejecting a classifier/vectorizer pair that was not
    /// trained together.
    pub fn new(
        model_dir: impl Into<PathBuf>,
        classifier: Box<dyn Classifier>,
        vectorizer: Box<dyn Vectorizer>,
        metadata: ModelMetadata,
    ) -> RiskResult<Self> {
        let model_dir = model_dir.into();

        if classifier.dimension() != vectorizer.dimension() {
            return Err(RiskError::model_load(
                &model_dir.join(MODEL_FILE),
                format!(
                    "classifier has {} features but vectorizer produces {}",
                    classifier.dimension(),
                    vectorizer.dimension()
                ),
            ));
        }

        if let Some(expected) = metadata.n_features {
            if expected != vectorizer.dimension() {
                return Err(RiskError::model_load(
                    &model_dir.join(METADATA_FILE),
                    format!("metadata declares {} features, vectorizer has {}", expected, vectorizer.dimension()),
                ));
            }
        }

        if let Some(expected) = metadata.vectorizer_fingerprint {
            let actual = vectorizer.fingerprint();
            if expected != actual {
                return Err(RiskError::model_load(
                    &model_dir.join(VECTORIZER_FILE),
                    format!("vocabulary fingerprint mismatch: expected {:08x}, got {:08x}", expected, actual),
                ));
            }
        }

        Ok(Self {
            model_dir,
            classifier,
            vectorizer,
            corpus: None,
            metadata,
        })
    }

    /// Attach a reference corpus, vectorised with this bundle's vectorizer
    pub fn with_corpus(mut self, corpus: &ReferenceCorpus) -> Self {
        self.corpus = if corpus.is_empty() {
            None
        } else {
            Some(corpus.index(self.vectorizer.as_ref()))
        };
        self
    }

    /// Load and validate all artifacts under `model_dir`
    pub fn load(model_dir: &Path) -> RiskResult<Self> {
        log::info!("Loading model artifacts from: {}", model_dir.display());

        let model_path = model_dir.join(MODEL_FILE);
        let classifier: LogisticClassifier = read_json(&model_path)?;
        classifier
            .validate()
            .map_err(|reason| RiskError::model_load(&model_path, reason))?;

        let vectorizer_path = model_dir.join(VECTORIZER_FILE);
        let vectorizer: TfidfVectorizer = read_json(&vectorizer_path)?;
        vectorizer
            .validate()
            .map_err(|reason| RiskError::model_load(&vectorizer_path, reason))?;

        let metadata_path = model_dir.join(METADATA_FILE);
        let metadata: ModelMetadata = if metadata_path.exists() {
            read_json(&metadata_path)?
        } else {
            ModelMetadata::default()
        };

        let corpus = metadata
            .dataset_path
            .as_ref()
            .and_then(|p| load_corpus(&resolve_dataset_path(model_dir, p)));

        let bundle = Self::new(model_dir, Box::new(classifier), Box::new(vectorizer), metadata)?;
        let bundle = match corpus {
            Some(corpus) => bundle.with_corpus(&corpus),
            None => bundle,
        };

        log::info!(
            "Model loaded: {} features, corpus {}",
            bundle.vectorizer.dimension(),
            bundle.corpus.as_ref().map_or(0, IndexedCorpus::len)
        );
        Ok(bundle)
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn vectorizer(&self) -> &dyn Vectorizer {
        self.vectorizer.as_ref()
    }

    pub fn corpus(&self) -> Option<&IndexedCorpus> {
        self.corpus.as_ref()
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

impl fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBundle")
            .field("model_dir", &self.model_dir)
            .field("classifier", &self.classifier.name())
            .field("features", &self.vectorizer.dimension())
            .field("corpus", &self.corpus.as_ref().map(IndexedCorpus::len))
            .finish()
    }
}

/// Relative dataset paths are relative to the model directory
fn resolve_dataset_path(model_dir: &Path, dataset_path: &Path) -> PathBuf {
    if dataset_path.is_absolute() {
        dataset_path.to_path_buf()
    } else {
        model_dir.join(dataset_path)
    }
}

/// A corpus that cannot be loaded degrades to "no corpus"
fn load_corpus(path: &Path) -> Option<ReferenceCorpus> {
    match ReferenceCorpus::load(path) {
        Ok(Some(corpus)) => Some(corpus),
        Ok(None) => {
            log::warn!("Reference corpus {} has no scored records", path.display());
            None
        }
        Err(e) => {
            log::warn!("Failed to load reference corpus: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_model_dir() {
        let models = tempfile::tempdir().unwrap();
        let model_dir = models.path().join("risk_model_001");
        fs::create_dir(&model_dir).unwrap();
        let model_file = model_dir.join(MODEL_FILE);
        fs::write(&model_file, "{}").unwrap();

        let as_dir = resolve_model_dir(models.path(), model_dir.to_str().unwrap()).unwrap();
        assert_eq!(as_dir, model_dir);

        let as_file = resolve_model_dir(models.path(), model_file.to_str().unwrap()).unwrap();
        assert_eq!(as_file, model_dir);

        let nested = resolve_model_dir(models.path(), "risk_model_001").unwrap();
        assert_eq!(nested, model_dir);

        let missing = resolve_model_dir(models.path(), "nope").unwrap();
        assert_eq!(missing, PathBuf::from("nope"));

        assert!(matches!(resolve_model_dir(models.path(), "  "), Err(RiskError::Input(_))));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let clf = LogisticClassifier::new(vec![0.1; 3], 0.0);
        let vec = TfidfVectorizer::from_terms(&["sql", "injection"]);
        let err = ModelBundle::new("/tmp/m", Box::new(clf), Box::new(vec), ModelMetadata::default()).unwrap_err();
        assert!(matches!(err, RiskError::ModelLoad { not_found: false, .. }));
    }

    #[test]
    fn test_fingerprint_mismatch_rejected() {
        let clf = LogisticClassifier::new(vec![0.1; 2], 0.0);
        let vec = TfidfVectorizer::from_terms(&["sql", "injection"]);
        let metadata = ModelMetadata {
            vectorizer_fingerprint: Some(vec.fingerprint().wrapping_add(1)),
            ..Default::default()
        };
        let err = ModelBundle::new("/tmp/m", Box::new(clf), Box::new(vec), metadata).unwrap_err();
        assert!(err.to_string().contains("fingerprint"));
    }

    #[test]
    fn test_relative_dataset_path() {
        let base = Path::new("/models/m1");
        assert_eq!(resolve_dataset_path(base, Path::new("train.json")), base.join("train.json"));
        assert_eq!(resolve_dataset_path(base, Path::new("/data/t.json")), PathBuf::from("/data/t.json"));
    }
}
