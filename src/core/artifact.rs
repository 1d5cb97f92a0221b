use crate::core::forest::RandomForest;
use crate::domain::model::{Dataset, FeatureVector, FEATURE_COLUMNS};
use crate::utils::error::{Result, RiskError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub samples: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Held-out accuracy. Reported only; it never blocks persistence.
    pub accuracy: Option<f64>,
    pub flipped_labels: usize,
    pub positive_rate: f64,
}

/// The single deployable file: the fitted forest plus the column order it
/// was trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema: Vec<String>,
    pub forest: RandomForest,
    pub metrics: TrainingMetrics,
    pub trained_at: DateTime<Utc>,
}

impl ModelArtifact {
    pub fn new(forest: RandomForest, metrics: TrainingMetrics) -> Self {
        Self {
            schema: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            forest,
            metrics,
            trained_at: Utc::now(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes and structurally checks an artifact. `path` is only used in
    /// the error message.
    pub fn from_bytes(bytes: &[u8], path: &str) -> Result<Self> {
        let corrupt = |message: String| RiskError::ArtifactCorrupt {
            path: path.to_string(),
            message,
        };
        let artifact: Self = serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;
        artifact.forest.check_structure().map_err(corrupt)?;
        Ok(artifact)
    }

    pub fn check_schema(&self) -> Result<()> {
        let matches = self.schema.len() == FEATURE_COLUMNS.len()
            && self.schema.iter().zip(FEATURE_COLUMNS).all(|(a, b)| a == b);
        if !matches {
            return Err(RiskError::SchemaMismatch {
                expected: FEATURE_COLUMNS.join(","),
                found: self.schema.join(","),
            });
        }
        Ok(())
    }

    pub fn predict_proba(&self, features: &FeatureVector) -> Result<f64> {
        self.check_schema()?;
        self.forest.predict_proba(&features.to_row())
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<bool> {
        self.check_schema()?;
        self.forest.predict(&features.to_row())
    }
}

/// Output of the fit phase: the artifact to persist and the table it was
/// fitted on, kept for the optional dataset export.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub artifact: ModelArtifact,
    pub dataset: Dataset,
}
