use crate::core::artifact::TrainedModel;
use crate::core::settings::TrainingSettings;
use crate::domain::model::{Dataset, FeatureVector};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn artifact_name(&self) -> &str;
    fn export_dataset(&self) -> bool;
    fn settings(&self) -> TrainingSettings;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn generate(&self) -> Result<Vec<FeatureVector>>;
    async fn label(&self, rows: Vec<FeatureVector>) -> Result<Dataset>;
    async fn fit(&self, dataset: Dataset) -> Result<TrainedModel>;
    async fn persist(&self, model: TrainedModel) -> Result<String>;
}
