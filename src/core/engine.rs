use crate::core::artifact::TrainingMetrics;
use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::PhaseMonitor;

#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub artifact_path: String,
    pub metrics: TrainingMetrics,
}

/// Runs generate → label → fit → persist over a `Pipeline`.
pub struct TrainingEngine<P: Pipeline> {
    pipeline: P,
    monitor_enabled: bool,
}

impl<P: Pipeline> TrainingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor_enabled,
        }
    }

    pub async fn run(&self) -> Result<TrainingSummary> {
        let mut monitor = PhaseMonitor::new(self.monitor_enabled);
        tracing::info!("🚀 Starting training run");

        let rows = self.pipeline.generate().await?;
        tracing::info!("🎲 Generated {} synthetic rows", rows.len());
        monitor.finish_phase("generate");

        let dataset = self.pipeline.label(rows).await?;
        tracing::info!(
            "🏷️ Labelled {} rows ({} flipped, {:.1}% positive)",
            dataset.len(),
            dataset.flipped,
            dataset.positive_rate() * 100.0
        );
        monitor.finish_phase("label");

        let model = self.pipeline.fit(dataset).await?;
        let metrics = model.artifact.metrics.clone();
        match metrics.accuracy {
            Some(accuracy) => tracing::info!("🌲 Model accuracy: {:.2}", accuracy),
            None => tracing::info!("🌲 Model fitted (no held-out rows)"),
        }
        monitor.finish_phase("fit");

        let artifact_path = self.pipeline.persist(model).await?;
        tracing::info!("💾 Artifact saved to: {}", artifact_path);
        monitor.finish_phase("persist");

        monitor.log_final_stats();

        Ok(TrainingSummary {
            artifact_path,
            metrics,
        })
    }
}
