pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::forest::ForestConfig;
#[cfg(feature = "cli")]
use crate::core::settings::TrainingSettings;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_ARTIFACT: &str = "heart_disease_model.json";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "cardio-risk")]
#[command(about = "Train the heart-disease risk classifier on synthetic data")]
pub struct CliConfig {
    #[arg(long, default_value = "./model")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_ARTIFACT)]
    pub artifact: String,

    #[arg(long, default_value = "500")]
    pub samples: usize,

    #[arg(long, default_value = "42")]
    pub seed: u64,

    #[arg(long, default_value = "100")]
    pub trees: usize,

    #[arg(long)]
    pub max_depth: Option<usize>,

    #[arg(long, default_value = "0.2")]
    pub test_fraction: f64,

    #[arg(long, default_value = "0.8")]
    pub noise_cutoff: f64,

    #[arg(long, help = "Also write dataset.csv and training_report.json")]
    pub export_dataset: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process memory and phase timings")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn artifact_name(&self) -> &str {
        &self.artifact
    }

    fn export_dataset(&self) -> bool {
        self.export_dataset
    }

    fn settings(&self) -> TrainingSettings {
        TrainingSettings {
            samples: self.samples,
            seed: self.seed,
            noise_cutoff: self.noise_cutoff,
            test_fraction: self.test_fraction,
            forest: ForestConfig {
                trees: self.trees,
                max_depth: self.max_depth,
                ..ForestConfig::default()
            },
            ..TrainingSettings::default()
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output_path", &self.output_path)?;
        validate_non_empty_string("artifact", &self.artifact)?;
        self.settings().validate()
    }
}
