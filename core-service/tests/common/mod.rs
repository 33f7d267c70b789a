//! On-disk model fixtures

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::json;

pub const TERMS: [&str; 12] = [
    "sql", "injection", "attack", "exploit", "remote", "code", "execution", "buffer", "overflow",
    "xss", "scripting", "login",
];

/// Write `model.json` + `vectorizer.json` for a classifier whose weights
/// favour the first nine terms
pub fn write_model(dir: &Path) {
    fs::create_dir_all(dir).unwrap();

    let vocabulary: serde_json::Map<String, serde_json::Value> = TERMS
        .iter()
        .enumerate()
        .map(|(i, t)| (t.to_string(), json!(i)))
        .collect();
    let vectorizer = json!({
        "vocabulary": vocabulary,
        "idf": vec![1.0; TERMS.len()],
        "ngram_range": [1, 1],
        "stop_words": ["a", "an", "the", "in", "of", "via", "to"],
    });
    fs::write(dir.join("vectorizer.json"), vectorizer.to_string()).unwrap();

    let mut coef = vec![2.0; 9];
    coef.extend([0.5, 0.5, 0.0]);
    let model = json!({ "coef": coef, "intercept": -1.0 });
    fs::write(dir.join("model.json"), model.to_string()).unwrap();
}

pub fn write_metadata(dir: &Path, metadata: serde_json::Value) {
    fs::write(dir.join("metadata.json"), metadata.to_string()).unwrap();
}

pub fn write_dataset(path: &Path, records: serde_json::Value) {
    fs::write(path, records.to_string()).unwrap();
}
