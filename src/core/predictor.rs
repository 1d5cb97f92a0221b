use crate::core::artifact::ModelArtifact;
use crate::domain::model::FeatureVector;
use crate::domain::ports::Storage;
use crate::utils::error::{Result, RiskError};

/// Scores feature vectors against a persisted artifact. The artifact is read
/// from storage on every call, so retraining takes effect immediately.
pub struct Predictor<S: Storage> {
    storage: S,
    artifact_path: String,
}

impl<S: Storage> Predictor<S> {
    pub fn new(storage: S, artifact_path: impl Into<String>) -> Self {
        Self {
            storage,
            artifact_path: artifact_path.into(),
        }
    }

    pub fn artifact_path(&self) -> &str {
        &self.artifact_path
    }

    pub async fn load(&self) -> Result<ModelArtifact> {
        let bytes = match self.storage.read_file(&self.artifact_path).await {
            Ok(bytes) => bytes,
            Err(RiskError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RiskError::ArtifactNotFound {
                    path: self.artifact_path.clone(),
                });
            }
            Err(e) => return Err(e),
        };
        let artifact = ModelArtifact::from_bytes(&bytes, &self.artifact_path)?;
        artifact.check_schema()?;
        Ok(artifact)
    }

    /// Inputs are not range-checked here.
    pub async fn predict(&self, features: &FeatureVector) -> Result<bool> {
        let artifact = self.load().await?;
        let prediction = artifact.predict(features)?;
        tracing::debug!("Prediction for {:?}: {}", features, prediction);
        Ok(prediction)
    }

    pub async fn predict_proba(&self, features: &FeatureVector) -> Result<f64> {
        self.load().await?.predict_proba(features)
    }

    /// One artifact load for the whole batch.
    pub async fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<bool>> {
        let artifact = self.load().await?;
        rows.iter().map(|row| artifact.predict(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::artifact::TrainingMetrics;
    use crate::core::forest::{ForestConfig, RandomForest};
    use crate::domain::model::{ChestPain, Sex};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStorage {
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl Storage for MemoryStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().expect("storage lock");
            files.get(path).cloned().ok_or_else(|| {
                RiskError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    path.to_string(),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().expect("storage lock");
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn person(age: u32) -> FeatureVector {
        FeatureVector {
            age,
            sex: Sex::Male,
            chest_pain: ChestPain::None,
            blood_pressure: 120,
            cholesterol: 200,
        }
    }

    /// Positive exactly when age is above 50.
    fn age_artifact() -> Vec<u8> {
        let x: Vec<Vec<f64>> = (20..80).map(|age| person(age).to_row()).collect();
        let y: Vec<bool> = (20..80).map(|age| age > 50).collect();
        let config = ForestConfig {
            trees: 5,
            bootstrap: false,
            ..ForestConfig::default()
        };
        let forest = RandomForest::fit(&x, &y, &config, 0).unwrap();
        let metrics = TrainingMetrics {
            samples: x.len(),
            train_rows: x.len(),
            test_rows: 0,
            accuracy: None,
            flipped_labels: 0,
            positive_rate: 0.5,
        };
        ModelArtifact::new(forest, metrics).to_bytes().unwrap()
    }

    #[test]
    fn test_predict_reads_artifact_each_call() {
        tokio_test::block_on(async {
            let storage = MemoryStorage::default();
            storage.write_file("m.json", &age_artifact()).await.unwrap();
            let predictor = Predictor::new(storage, "m.json");

            assert!(predictor.predict(&person(75)).await.unwrap());
            assert!(!predictor.predict(&person(30)).await.unwrap());

            // 覆寫為壞檔後，下一次呼叫就會失敗
            predictor
                .storage
                .write_file("m.json", b"{}")
                .await
                .unwrap();
            let err = predictor.predict(&person(75)).await.unwrap_err();
            assert!(matches!(err, RiskError::ArtifactCorrupt { .. }));
        });
    }

    #[test]
    fn test_missing_artifact_maps_to_not_found() {
        tokio_test::block_on(async {
            let predictor = Predictor::new(MemoryStorage::default(), "absent.json");
            let err = predictor.predict(&person(40)).await.unwrap_err();
            assert!(
                matches!(err, RiskError::ArtifactNotFound { ref path } if path == "absent.json")
            );
        });
    }
}
