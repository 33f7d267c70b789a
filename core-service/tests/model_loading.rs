//! Model directory loading & registry caching

mod common;

use std::fs;
use std::sync::Arc;

use serde_json::json;
use vulnrisk_core::logic::features::Vectorizer;
use vulnrisk_core::{ModelBundle, ModelRegistry, RiskError};

#[test]
fn test_load_minimal_model() {
    let dir = tempfile::tempdir().unwrap();
    common::write_model(dir.path());

    let bundle = ModelBundle::load(dir.path()).unwrap();
    assert_eq!(bundle.vectorizer().dimension(), common::TERMS.len());
    assert_eq!(bundle.classifier().dimension(), common::TERMS.len());
    assert!(bundle.corpus().is_none());
    assert_eq!(bundle.metadata().alpha(), None);
}

#[test]
fn test_missing_model_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelBundle::load(dir.path()).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("model.json"));
}

#[test]
fn test_missing_vectorizer_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    common::write_model(dir.path());
    fs::remove_file(dir.path().join("vectorizer.json")).unwrap();

    let err = ModelBundle::load(dir.path()).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("vectorizer.json"));
}

#[test]
fn test_corrupt_artifact_is_model_load_error() {
    let dir = tempfile::tempdir().unwrap();
    common::write_model(dir.path());
    fs::write(dir.path().join("model.json"), "{\"coef\": [1.0,").unwrap();

    let err = ModelBundle::load(dir.path()).unwrap_err();
    assert!(matches!(err, RiskError::ModelLoad { not_found: false, .. }));
}

#[test]
fn test_classifier_vectorizer_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    common::write_model(dir.path());
    fs::write(dir.path().join("model.json"), json!({"coef": [1.0, 2.0], "intercept": 0.0}).to_string()).unwrap();

    let err = ModelBundle::load(dir.path()).unwrap_err();
    assert!(matches!(err, RiskError::ModelLoad { .. }));
    assert!(!err.is_not_found());
}

#[test]
fn test_metadata_and_relative_dataset() {
    let dir = tempfile::tempdir().unwrap();
    common::write_model(dir.path());
    common::write_dataset(
        &dir.path().join("train.json"),
        json!([
            {"text_description": "SQL injection in login form", "cvss_base_score": 9.8},
            {"text_description": "XSS via scripting", "cvss_base_score": 6.1},
            {"text_description": "unscored record"}
        ]),
    );
    common::write_metadata(
        dir.path(),
        json!({
            "model_type": "logistic_regression",
            "params": {"alpha": 0.7},
            "dataset_path": "train.json",
            "n_features": common::TERMS.len()
        }),
    );

    let bundle = ModelBundle::load(dir.path()).unwrap();
    assert_eq!(bundle.metadata().alpha(), Some(0.7));
    assert_eq!(bundle.corpus().map(|c| c.len()), Some(2));
}

#[test]
fn test_unreadable_dataset_degrades_to_no_corpus() {
    let dir = tempfile::tempdir().unwrap();
    common::write_model(dir.path());
    common::write_metadata(dir.path(), json!({"dataset_path": "/definitely/not/here.json"}));

    let bundle = ModelBundle::load(dir.path()).unwrap();
    assert!(bundle.corpus().is_none());
}

#[test]
fn test_fingerprint_checked_against_metadata() {
    let dir = tempfile::tempdir().unwrap();
    common::write_model(dir.path());

    let fingerprint = ModelBundle::load(dir.path()).unwrap().vectorizer().fingerprint();
    common::write_metadata(dir.path(), json!({"vectorizer_fingerprint": fingerprint}));
    assert!(ModelBundle::load(dir.path()).is_ok());

    common::write_metadata(dir.path(), json!({"vectorizer_fingerprint": fingerprint ^ 1}));
    assert!(ModelBundle::load(dir.path()).is_err());
}

#[test]
fn test_registry_caches_and_evicts() {
    let models = tempfile::tempdir().unwrap();
    common::write_model(&models.path().join("risk_model_001"));
    let registry = ModelRegistry::new(models.path());

    let first = registry.get_or_load("risk_model_001").unwrap();
    let again = registry.get_or_load(models.path().join("risk_model_001").to_str().unwrap()).unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(registry.len(), 1);

    assert!(registry.evict("risk_model_001"));
    assert!(registry.is_empty());
    assert!(!registry.evict("risk_model_001"));

    let reloaded = registry.get_or_load("risk_model_001").unwrap();
    assert!(!Arc::ptr_eq(&first, &reloaded));
}

#[test]
fn test_registry_unknown_model() {
    let models = tempfile::tempdir().unwrap();
    let registry = ModelRegistry::new(models.path());

    let err = registry.get_or_load("missing_model").unwrap_err();
    assert!(err.is_not_found());
    assert!(registry.is_empty());
}
