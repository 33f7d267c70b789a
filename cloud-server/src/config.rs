//! Configuration module
//!
//! Read once from the environment at startup; the risk settings are then
//! frozen into an immutable `RiskConfig` shared through `AppState`.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use vulnrisk_core::constants::DEFAULT_MODELS_DIR;
use vulnrisk_core::RiskConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Base directory for relative model paths
    pub models_dir: PathBuf,

    /// Environment (development, production)
    pub environment: String,

    /// Scoring and gating thresholds
    pub risk: RiskConfig,
}

/// Parse an env var, falling back to `default` when unset or malformed
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = RiskConfig::default();

        let risk = RiskConfig {
            alpha: env_or("RISK_ALPHA", defaults.alpha),
            similarity_threshold: env_or("CVSS_SIM_THRESHOLD", defaults.similarity_threshold),
            pvuln_uncertain_low: env_or("PVULN_UNCERTAIN_LOW", defaults.pvuln_uncertain_low),
            pvuln_uncertain_high: env_or("PVULN_UNCERTAIN_HIGH", defaults.pvuln_uncertain_high),
            min_text_length: env_or("MIN_TEXT_LENGTH", defaults.min_text_length),
            gate_enabled: env::var("CLIP_NA_ENABLED")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.gate_enabled),
            pvuln_threshold: env_or("CLIP_PVULN_THRESHOLD", defaults.pvuln_threshold),
            min_nonzero_features: env_or("CLIP_MIN_NONZERO_TFIDF", defaults.min_nonzero_features),
            top_k: defaults.top_k,
        };

        Self {
            port: env_or("PORT", 5000),

            models_dir: env::var("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODELS_DIR)),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            risk,
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
