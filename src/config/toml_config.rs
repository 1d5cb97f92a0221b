use crate::config::DEFAULT_ARTIFACT;
use crate::core::forest::ForestConfig;
use crate::core::settings::{Calibration, FeatureRanges, TrainingSettings};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, RiskError};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub calibration: Calibration,
    #[serde(default)]
    pub forest: ForestConfig,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub samples: usize,
    pub seed: u64,
    pub noise_cutoff: f64,
    pub test_fraction: f64,
    pub ranges: FeatureRanges,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        let defaults = TrainingSettings::default();
        Self {
            samples: defaults.samples,
            seed: defaults.seed,
            noise_cutoff: defaults.noise_cutoff,
            test_fraction: defaults.test_fraction,
            ranges: defaults.ranges,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub artifact: Option<String>,
    pub export_dataset: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern compiles"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RiskError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_DIR})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("model.name", &self.model.name)?;
        validate_path("output.path", &self.output.path)?;
        validate_non_empty_string("output.artifact", self.artifact_name())?;

        if self.output.path.contains("${") {
            return Err(RiskError::MissingConfigError {
                field: format!("environment variable in output.path ({})", self.output.path),
            });
        }

        self.training_settings().validate()
    }

    pub fn training_settings(&self) -> TrainingSettings {
        TrainingSettings {
            samples: self.dataset.samples,
            seed: self.dataset.seed,
            noise_cutoff: self.dataset.noise_cutoff,
            test_fraction: self.dataset.test_fraction,
            ranges: self.dataset.ranges,
            calibration: self.calibration,
            forest: self.forest,
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn artifact_name(&self) -> &str {
        self.output.artifact.as_deref().unwrap_or(DEFAULT_ARTIFACT)
    }

    fn export_dataset(&self) -> bool {
        self.output.export_dataset.unwrap_or(false)
    }

    fn settings(&self) -> TrainingSettings {
        self.training_settings()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
