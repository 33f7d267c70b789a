//! VulnRisk CLI
//!
//! Score one text or a JSON file of samples against a model directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use vulnrisk_core::constants::{get_models_dir, APP_NAME, APP_VERSION};
use vulnrisk_core::logic::model::resolve_model_dir;
use vulnrisk_core::{ModelBundle, RiskConfig, RiskPipeline, Sample};

#[derive(Parser)]
#[command(name = "vulnrisk", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single text (strict gate)
    Predict {
        /// Model directory, or a path relative to MODELS_DIR
        #[arg(long)]
        model_dir: String,
        /// Text description to score
        #[arg(long)]
        text: String,
        /// Known severity (0-10)
        #[arg(long)]
        cvss: Option<f64>,
        /// Sample identifier
        #[arg(long)]
        id: Option<String>,
        #[command(flatten)]
        risk: RiskArgs,
    },
    /// Score a JSON array of samples (batch gate)
    Batch {
        /// Model directory, or a path relative to MODELS_DIR
        #[arg(long)]
        model_dir: String,
        /// JSON file: [{"sample_id", "text_description", "cvss_base_score"}]
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        risk: RiskArgs,
    },
}

/// Overrides for the scoring configuration
#[derive(Args)]
struct RiskArgs {
    /// Blend weight of P(vuln) against severity
    #[arg(long)]
    alpha: Option<f64>,
    /// Minimum corpus similarity
    #[arg(long)]
    sim_threshold: Option<f64>,
    /// Minimum processed text length
    #[arg(long)]
    min_text_length: Option<usize>,
    /// Single-sample P(vuln) cutoff
    #[arg(long)]
    pvuln_threshold: Option<f64>,
    /// Lower edge of the batch uncertain P(vuln) band
    #[arg(long)]
    pvuln_uncertain_low: Option<f64>,
    /// Upper edge of the batch uncertain P(vuln) band
    #[arg(long)]
    pvuln_uncertain_high: Option<f64>,
    /// Minimum non-zero TF-IDF features
    #[arg(long)]
    min_nonzero: Option<usize>,
    /// Disable single-sample gating
    #[arg(long)]
    no_gate: bool,
}

impl RiskArgs {
    fn to_config(&self) -> Result<RiskConfig> {
        let defaults = RiskConfig::default();
        let config = RiskConfig {
            alpha: self.alpha.unwrap_or(defaults.alpha),
            similarity_threshold: self.sim_threshold.unwrap_or(defaults.similarity_threshold),
            min_text_length: self.min_text_length.unwrap_or(defaults.min_text_length),
            pvuln_threshold: self.pvuln_threshold.unwrap_or(defaults.pvuln_threshold),
            pvuln_uncertain_low: self.pvuln_uncertain_low.unwrap_or(defaults.pvuln_uncertain_low),
            pvuln_uncertain_high: self.pvuln_uncertain_high.unwrap_or(defaults.pvuln_uncertain_high),
            min_nonzero_features: self.min_nonzero.unwrap_or(defaults.min_nonzero_features),
            gate_enabled: !self.no_gate,
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }
}

fn load_bundle(model_dir: &str) -> Result<ModelBundle> {
    let models_dir = PathBuf::from(get_models_dir());
    let dir = resolve_model_dir(&models_dir, model_dir)?;
    let bundle = ModelBundle::load(&dir).with_context(|| format!("loading model from {}", dir.display()))?;
    Ok(bundle)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::debug!("{} v{}", APP_NAME, APP_VERSION);

    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Predict { model_dir, text, cvss, id, risk } => {
            let config = risk.to_config()?;
            let bundle = load_bundle(&model_dir)?;
            let pipeline = RiskPipeline::new(&bundle, &config);

            let sample = Sample {
                sample_id: id,
                text_description: text,
                cvss_base_score: cvss,
            };
            serde_json::to_string_pretty(&pipeline.assess(&sample)?)?
        }
        Commands::Batch { model_dir, input, risk } => {
            let config = risk.to_config()?;
            let bundle = load_bundle(&model_dir)?;
            let pipeline = RiskPipeline::new(&bundle, &config);

            let data = fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
            let samples: Vec<Sample> =
                serde_json::from_str(&data).with_context(|| format!("parsing {}", input.display()))?;
            serde_json::to_string_pretty(&pipeline.assess_batch(&samples)?)?
        }
    };

    println!("{}", output);
    Ok(())
}
