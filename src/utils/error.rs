use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Model artifact not found: {path}")]
    ArtifactNotFound { path: String },

    #[error("Model artifact '{path}' is unreadable: {message}")]
    ArtifactCorrupt { path: String, message: String },

    #[error("Feature schema mismatch: expected [{expected}], found [{found}]")]
    SchemaMismatch { expected: String, found: String },

    #[error("Training error: {message}")]
    TrainingError { message: String },

    #[error("Cannot apply '{event}' while on the {from} page")]
    InvalidTransition { from: String, event: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Input,
    Model,
    Navigation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RiskError::IoError(_) | RiskError::CsvError(_) => ErrorCategory::Io,
            RiskError::ConfigError { .. }
            | RiskError::ConfigValidationError { .. }
            | RiskError::InvalidConfigValueError { .. }
            | RiskError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RiskError::ValidationError { .. } => ErrorCategory::Input,
            RiskError::SerializationError(_)
            | RiskError::ArtifactNotFound { .. }
            | RiskError::ArtifactCorrupt { .. }
            | RiskError::SchemaMismatch { .. }
            | RiskError::TrainingError { .. } => ErrorCategory::Model,
            RiskError::InvalidTransition { .. } => ErrorCategory::Navigation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RiskError::InvalidTransition { .. } => ErrorSeverity::Low,
            RiskError::ValidationError { .. } | RiskError::CsvError(_) => ErrorSeverity::Medium,
            RiskError::ConfigError { .. }
            | RiskError::ConfigValidationError { .. }
            | RiskError::InvalidConfigValueError { .. }
            | RiskError::MissingConfigError { .. }
            | RiskError::TrainingError { .. } => ErrorSeverity::High,
            RiskError::IoError(_)
            | RiskError::SerializationError(_)
            | RiskError::ArtifactNotFound { .. }
            | RiskError::ArtifactCorrupt { .. }
            | RiskError::SchemaMismatch { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RiskError::IoError(_) => "Check that the output directory exists and is writable",
            RiskError::SerializationError(_) => "Retrain the model to produce a fresh artifact",
            RiskError::CsvError(_) => "Check the CSV header: age,sex,cp,trestbps,chol",
            RiskError::ConfigError { .. }
            | RiskError::ConfigValidationError { .. }
            | RiskError::InvalidConfigValueError { .. }
            | RiskError::MissingConfigError { .. } => {
                "Review the configuration file or command-line flags"
            }
            RiskError::ValidationError { .. } => "Please fill all the fields with valid values",
            RiskError::ArtifactNotFound { .. } => {
                "Run the training command first, or pass the correct --artifact path"
            }
            RiskError::ArtifactCorrupt { .. } => "Delete the artifact and train the model again",
            RiskError::SchemaMismatch { .. } => {
                "Retrain the model so its feature columns match this version"
            }
            RiskError::TrainingError { .. } => "Increase the sample count or relax forest limits",
            RiskError::InvalidTransition { .. } => "Start over from the home page",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RiskError::ArtifactNotFound { path } => {
                format!("No trained model found at '{}'", path)
            }
            RiskError::ValidationError { message } => format!("Invalid input: {}", message),
            RiskError::SchemaMismatch { .. } => {
                "The trained model does not match the expected input fields".to_string()
            }
            other => other.to_string(),
        }
    }

    /// 依嚴重程度決定 CLI 結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        RiskError::ValidationError {
            message: message.into(),
        }
    }

    pub fn training(message: impl Into<String>) -> Self {
        RiskError::TrainingError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RiskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_errors_are_fatal() {
        let err = RiskError::ArtifactNotFound {
            path: "model.json".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Model);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("model.json"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: RiskError = io.into();
        assert_eq!(err.category(), ErrorCategory::Io);
    }
}
