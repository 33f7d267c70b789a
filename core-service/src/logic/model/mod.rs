//! Model Module - trained artifacts the risk pipeline consumes
//!
//! Classifier, model metadata, reference corpus, and the loading/caching of
//! a model directory.

pub mod classifier;
pub mod metadata;
pub mod corpus;
pub mod artifacts;
pub mod registry;

// Re-export common types
pub use classifier::{Classifier, LogisticClassifier};
pub use metadata::{ModelMetadata, ModelParams};
pub use corpus::{CorpusEntry, IndexedCorpus, IndexedEntry, ReferenceCorpus};
pub use artifacts::{resolve_model_dir, ModelBundle};
pub use registry::ModelRegistry;
