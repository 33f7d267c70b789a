//! VulnRisk Core - risk scoring & applicability gating
//!
//! Turns a classifier probability and an optional severity into a gated,
//! explainable risk verdict for a security-relevant text sample.

pub mod constants;
pub mod logic;

pub use logic::config::{GateMode, RiskConfig};
pub use logic::error::{RiskError, RiskResult};
pub use logic::model::{ModelBundle, ModelRegistry};
pub use logic::risk::{BatchReport, PredictionReport, RiskOutcome, RiskPipeline, Sample};
