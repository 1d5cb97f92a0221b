pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use app::pipelines::TrainingPipeline;
pub use app::session::{Event, Page, Profile, Session};
pub use crate::core::{artifact::ModelArtifact, engine::TrainingEngine, predictor::Predictor};
pub use domain::model::{ChestPain, FeatureVector, Sex, FEATURE_COLUMNS};
pub use utils::error::{Result, RiskError};
