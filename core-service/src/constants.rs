//! Central Configuration Constants
//!
//! Single source of truth for artifact names and deployment defaults.
//! Scoring thresholds live in `logic::risk::rules`.

/// Default directory that relative model paths are resolved against
pub const DEFAULT_MODELS_DIR: &str = "/app/models";

/// Classifier artifact inside a model directory
pub const MODEL_FILE: &str = "model.json";

/// Vectorizer artifact inside a model directory
pub const VECTORIZER_FILE: &str = "vectorizer.json";

/// Optional metadata artifact inside a model directory
pub const METADATA_FILE: &str = "metadata.json";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "vulnrisk";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get models directory from environment or use default
pub fn get_models_dir() -> String {
    std::env::var("MODELS_DIR")
        .unwrap_or_else(|_| DEFAULT_MODELS_DIR.to_string())
}
