pub mod training_pipeline;

pub use training_pipeline::TrainingPipeline;
