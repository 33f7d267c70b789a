//! Logic Module - Business Logic & Engines
//!
//! ## Architecture
//! - `features/` - Text feature extraction (preprocess, TF-IDF, signal)
//! - `model/` - Trained artifacts (classifier, metadata, corpus, registry)
//! - `risk/` - Confidence, severity, gate, scorer, pipeline
//! - `config.rs` - Immutable risk configuration
//! - `error.rs` - Error taxonomy

pub mod error;
pub mod config;
pub mod features;
pub mod model;
pub mod risk;
