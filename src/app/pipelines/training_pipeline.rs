use crate::core::artifact::{ModelArtifact, TrainedModel, TrainingMetrics};
use crate::core::forest::RandomForest;
use crate::core::labeling::Labeler;
use crate::core::split::TrainTestSplit;
use crate::core::synthetic::SyntheticGenerator;
use crate::core::{ConfigProvider, Dataset, FeatureVector, Pipeline, Storage};
use crate::domain::model::LabelledRow;
use crate::utils::error::{Result, RiskError};
use crate::utils::validation::Validate;

pub const DATASET_FILE: &str = "dataset.csv";
pub const REPORT_FILE: &str = "training_report.json";

/// 以設定產生資料、標記、訓練並寫出模型檔
pub struct TrainingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> TrainingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn dataset_csv(dataset: &Dataset) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for (row, &label) in dataset.rows.iter().zip(&dataset.labels) {
            writer.serialize(LabelledRow::new(row, label))?;
        }
        writer
            .into_inner()
            .map_err(|e| RiskError::IoError(e.into_error()))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TrainingPipeline<S, C> {
    async fn generate(&self) -> Result<Vec<FeatureVector>> {
        let settings = self.config.settings();
        settings.validate()?;

        tracing::debug!(
            "Drawing {} rows with seed {}",
            settings.samples,
            settings.seed
        );
        SyntheticGenerator::new(settings.ranges, settings.seed).generate(settings.samples)
    }

    async fn label(&self, rows: Vec<FeatureVector>) -> Result<Dataset> {
        let settings = self.config.settings();
        Labeler::new(settings.calibration, settings.noise_cutoff, settings.seed).label(rows)
    }

    async fn fit(&self, dataset: Dataset) -> Result<TrainedModel> {
        let settings = self.config.settings();
        let split = TrainTestSplit::new(dataset.len(), settings.test_fraction, settings.seed);
        let (x_train, y_train) = split.select(&dataset, false);
        let (x_test, y_test) = split.select(&dataset, true);

        tracing::debug!(
            "Fitting {} trees on {} rows, holding out {}",
            settings.forest.trees,
            x_train.len(),
            x_test.len()
        );

        let forest = RandomForest::fit(&x_train, &y_train, &settings.forest, settings.seed)?;
        // 準確率只做回報，不作為是否部署的門檻
        let accuracy = forest.score(&x_test, &y_test)?;

        let metrics = TrainingMetrics {
            samples: dataset.len(),
            train_rows: x_train.len(),
            test_rows: x_test.len(),
            accuracy,
            flipped_labels: dataset.flipped,
            positive_rate: dataset.positive_rate(),
        };

        Ok(TrainedModel {
            artifact: ModelArtifact::new(forest, metrics),
            dataset,
        })
    }

    async fn persist(&self, model: TrainedModel) -> Result<String> {
        let artifact_name = self.config.artifact_name();
        let bytes = model.artifact.to_bytes()?;
        self.storage.write_file(artifact_name, &bytes).await?;
        tracing::debug!("Wrote {} bytes to {}", bytes.len(), artifact_name);

        if self.config.export_dataset() {
            let csv = Self::dataset_csv(&model.dataset)?;
            self.storage.write_file(DATASET_FILE, &csv).await?;

            let report = serde_json::to_vec_pretty(&model.artifact.metrics)?;
            self.storage.write_file(REPORT_FILE, &report).await?;
            tracing::info!("📄 Exported {} and {}", DATASET_FILE, REPORT_FILE);
        }

        let output_path = std::path::Path::new(self.config.output_path())
            .join(artifact_name)
            .to_string_lossy()
            .into_owned();
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::TrainingEngine;
    use crate::core::forest::ForestConfig;
    use crate::core::settings::TrainingSettings;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                RiskError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct TestConfig {
        settings: TrainingSettings,
        export: bool,
    }

    impl ConfigProvider for TestConfig {
        fn output_path(&self) -> &str {
            "./model"
        }

        fn artifact_name(&self) -> &str {
            "model.json"
        }

        fn export_dataset(&self) -> bool {
            self.export
        }

        fn settings(&self) -> TrainingSettings {
            self.settings.clone()
        }
    }

    fn config(export: bool) -> TestConfig {
        TestConfig {
            settings: TrainingSettings {
                samples: 200,
                forest: ForestConfig {
                    trees: 10,
                    ..ForestConfig::default()
                },
                ..TrainingSettings::default()
            },
            export,
        }
    }

    #[tokio::test]
    async fn test_fit_holds_out_twenty_percent() {
        let pipeline = TrainingPipeline::new(MockStorage::new(), config(false));
        let rows = pipeline.generate().await.unwrap();
        let dataset = pipeline.label(rows).await.unwrap();
        let model = pipeline.fit(dataset).await.unwrap();

        assert_eq!(model.artifact.metrics.samples, 200);
        assert_eq!(model.artifact.metrics.test_rows, 40);
        assert_eq!(model.artifact.metrics.train_rows, 160);
        assert!(model.artifact.metrics.accuracy.is_some());
        assert_eq!(model.artifact.forest.n_trees(), 10);
    }

    #[tokio::test]
    async fn test_engine_writes_artifact_and_exports() {
        let storage = MockStorage::new();
        let pipeline = TrainingPipeline::new(storage.clone(), config(true));
        let summary = TrainingEngine::new(pipeline).run().await.unwrap();

        assert!(summary.artifact_path.ends_with("model.json"));
        let bytes = storage.get_file("model.json").await.unwrap();
        let artifact = ModelArtifact::from_bytes(&bytes, "model.json").unwrap();
        assert_eq!(artifact.metrics, summary.metrics);

        let csv = storage.get_file(DATASET_FILE).await.unwrap();
        let text = String::from_utf8(csv).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("age,sex,cp,trestbps,chol,target"));
        assert_eq!(lines.count(), 200);

        assert!(storage.get_file(REPORT_FILE).await.is_some());
    }

    #[tokio::test]
    async fn test_no_export_by_default() {
        let storage = MockStorage::new();
        let pipeline = TrainingPipeline::new(storage.clone(), config(false));
        TrainingEngine::new(pipeline).run().await.unwrap();
        assert!(storage.get_file(DATASET_FILE).await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_settings_fail_before_generation() {
        let mut bad = config(false);
        bad.settings.samples = 1;
        let pipeline = TrainingPipeline::new(MockStorage::new(), bad);
        assert!(pipeline.generate().await.is_err());
    }
}
