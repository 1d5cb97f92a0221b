pub mod artifact;
pub mod engine;
pub mod forest;
pub mod labeling;
pub mod predictor;
pub mod settings;
pub mod split;
pub mod synthetic;

pub use crate::domain::model::{Dataset, FeatureVector};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
