//! Features Module - Text Feature Extraction
//!
//! Turns raw sample text into the sparse vector the classifier consumes and
//! the `FeatureSignal` the risk core reasons about.

pub mod text;
pub mod sparse;
pub mod tfidf;
pub mod signal;


// Re-export common types
pub use text::{preprocess, has_domain_keywords, DOMAIN_KEYWORDS};
pub use sparse::SparseVector;
pub use tfidf::{TfidfVectorizer, Vectorizer};
pub use signal::FeatureSignal;
