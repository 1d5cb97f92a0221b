//! Heuristic labels for the synthetic table: a weighted score, a mean
//! threshold, then seeded label noise.

use crate::core::settings::Calibration;
use crate::domain::model::{Dataset, FeatureVector};
use crate::utils::error::{Result, RiskError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed of the noise stream, kept apart from the generator's stream.
pub fn noise_seed(seed: u64) -> u64 {
    seed.wrapping_add(1)
}

pub fn risk_score(features: &FeatureVector, calibration: &Calibration) -> f64 {
    (features.age as f64 - calibration.age_offset) / calibration.age_scale
        + u8::from(features.sex) as f64 * calibration.sex_weight
        + u8::from(features.chest_pain) as f64 * calibration.chest_pain_weight
        + (features.blood_pressure as f64 - calibration.blood_pressure_offset)
            / calibration.blood_pressure_scale
        + (features.cholesterol as f64 - calibration.cholesterol_offset)
            / calibration.cholesterol_scale
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// `score > mean(scores)`, strictly.
pub fn threshold_at_mean(scores: &[f64]) -> (f64, Vec<bool>) {
    let threshold = mean(scores);
    let labels = scores.iter().map(|&s| s > threshold).collect();
    (threshold, labels)
}

/// Inverts every label whose draw exceeds `cutoff`; returns the flip count.
pub fn apply_label_noise(labels: &mut [bool], draws: &[f64], cutoff: f64) -> usize {
    let mut flipped = 0;
    for (label, &draw) in labels.iter_mut().zip(draws) {
        if draw > cutoff {
            *label = !*label;
            flipped += 1;
        }
    }
    flipped
}

pub struct Labeler {
    calibration: Calibration,
    noise_cutoff: f64,
    seed: u64,
}

impl Labeler {
    pub fn new(calibration: Calibration, noise_cutoff: f64, seed: u64) -> Self {
        Self {
            calibration,
            noise_cutoff,
            seed,
        }
    }

    pub fn label(&self, rows: Vec<FeatureVector>) -> Result<Dataset> {
        if rows.is_empty() {
            return Err(RiskError::training("cannot label an empty table"));
        }

        let scores: Vec<f64> = rows
            .iter()
            .map(|row| risk_score(row, &self.calibration))
            .collect();
        let (threshold, mut labels) = threshold_at_mean(&scores);

        let mut rng = StdRng::seed_from_u64(noise_seed(self.seed));
        let draws: Vec<f64> = (0..rows.len()).map(|_| rng.gen::<f64>()).collect();
        let flipped = apply_label_noise(&mut labels, &draws, self.noise_cutoff);

        tracing::debug!(
            "Risk threshold {:.4}, flipped {}/{} labels",
            threshold,
            flipped,
            rows.len()
        );

        Ok(Dataset {
            rows,
            labels,
            flipped,
        })
    }
}
