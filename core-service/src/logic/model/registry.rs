//! Model Registry - loaded bundles keyed by resolved directory
//!
//! Owned by the caller (server state, CLI), never global. Loading happens
//! outside the lock; concurrent first requests may load twice, the first
//! insert wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::logic::error::RiskResult;

use super::artifacts::{resolve_model_dir, ModelBundle};

pub struct ModelRegistry {
    models_dir: PathBuf,
    cache: RwLock<HashMap<PathBuf, Arc<ModelBundle>>>,
}

impl ModelRegistry {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Cached bundle for `model_path`, loading it on first use
    pub fn get_or_load(&self, model_path: &str) -> RiskResult<Arc<ModelBundle>> {
        let dir = resolve_model_dir(&self.models_dir, model_path)?;

        if let Some(bundle) = self.cache.read().get(&dir) {
            return Ok(Arc::clone(bundle));
        }

        let loaded = Arc::new(ModelBundle::load(&dir)?);
        let mut cache = self.cache.write();
        let bundle = cache.entry(dir).or_insert(loaded);
        Ok(Arc::clone(bundle))
    }

    /// Drop a cached bundle so the next request reloads it from disk
    pub fn evict(&self, model_path: &str) -> bool {
        match resolve_model_dir(&self.models_dir, model_path) {
            Ok(dir) => {
                let removed = self.cache.write().remove(&dir).is_some();
                if removed {
                    log::info!("Evicted model: {}", dir.display());
                }
                removed
            }
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}
