use crate::core::forest::ForestConfig;
use crate::utils::error::{Result, RiskError};
use crate::utils::validation::{
    validate_bounds, validate_fraction, validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};

/// Half-open `[low, high)` integer sampling range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRange {
    pub low: u32,
    pub high: u32,
}

impl SampleRange {
    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureRanges {
    pub age: SampleRange,
    pub sex: SampleRange,
    pub chest_pain: SampleRange,
    pub blood_pressure: SampleRange,
    pub cholesterol: SampleRange,
}

impl Default for FeatureRanges {
    fn default() -> Self {
        Self {
            age: SampleRange::new(25, 80),
            sex: SampleRange::new(0, 2),
            chest_pain: SampleRange::new(0, 4),
            blood_pressure: SampleRange::new(90, 200),
            cholesterol: SampleRange::new(120, 400),
        }
    }
}

impl Validate for FeatureRanges {
    fn validate(&self) -> Result<()> {
        validate_bounds("ranges.age", self.age.low, self.age.high)?;
        validate_bounds("ranges.sex", self.sex.low, self.sex.high)?;
        validate_bounds("ranges.chest_pain", self.chest_pain.low, self.chest_pain.high)?;
        validate_bounds(
            "ranges.blood_pressure",
            self.blood_pressure.low,
            self.blood_pressure.high,
        )?;
        validate_bounds("ranges.cholesterol", self.cholesterol.low, self.cholesterol.high)?;

        // 類別欄位不能超出編碼範圍
        if self.sex.high > 2 {
            return Err(RiskError::InvalidConfigValueError {
                field: "ranges.sex".to_string(),
                value: self.sex.high.to_string(),
                reason: "sex codes are 0 and 1".to_string(),
            });
        }
        if self.chest_pain.high > 4 {
            return Err(RiskError::InvalidConfigValueError {
                field: "ranges.chest_pain".to_string(),
                value: self.chest_pain.high.to_string(),
                reason: "chest pain codes are 0 to 3".to_string(),
            });
        }
        Ok(())
    }
}

/// Offsets, scales and weights of the synthetic risk score. These are demo
/// calibration values, not clinical coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub age_offset: f64,
    pub age_scale: f64,
    pub sex_weight: f64,
    pub chest_pain_weight: f64,
    pub blood_pressure_offset: f64,
    pub blood_pressure_scale: f64,
    pub cholesterol_offset: f64,
    pub cholesterol_scale: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            age_offset: 30.0,
            age_scale: 50.0,
            sex_weight: 0.5,
            chest_pain_weight: 0.3,
            blood_pressure_offset: 110.0,
            blood_pressure_scale: 80.0,
            cholesterol_offset: 150.0,
            cholesterol_scale: 250.0,
        }
    }
}

impl Validate for Calibration {
    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("calibration.age_offset", self.age_offset),
            ("calibration.sex_weight", self.sex_weight),
            ("calibration.chest_pain_weight", self.chest_pain_weight),
            ("calibration.blood_pressure_offset", self.blood_pressure_offset),
            ("calibration.cholesterol_offset", self.cholesterol_offset),
        ] {
            if !value.is_finite() {
                return Err(RiskError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "Value must be a finite number".to_string(),
                });
            }
        }
        for (field, scale) in [
            ("calibration.age_scale", self.age_scale),
            ("calibration.blood_pressure_scale", self.blood_pressure_scale),
            ("calibration.cholesterol_scale", self.cholesterol_scale),
        ] {
            if scale == 0.0 || !scale.is_finite() {
                return Err(RiskError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: scale.to_string(),
                    reason: "Scale must be a finite, non-zero number".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Everything that determines a training run. Two runs with equal settings
/// produce identical datasets and forests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSettings {
    pub samples: usize,
    pub seed: u64,
    /// Labels are inverted when their noise draw exceeds this value.
    pub noise_cutoff: f64,
    pub test_fraction: f64,
    pub ranges: FeatureRanges,
    pub calibration: Calibration,
    pub forest: ForestConfig,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            samples: 500,
            seed: 42,
            noise_cutoff: 0.8,
            test_fraction: 0.2,
            ranges: FeatureRanges::default(),
            calibration: Calibration::default(),
            forest: ForestConfig::default(),
        }
    }
}

impl Validate for TrainingSettings {
    fn validate(&self) -> Result<()> {
        // 至少要能切出訓練與測試各一筆
        validate_positive_number("dataset.samples", self.samples, 2)?;
        validate_fraction("dataset.noise_cutoff", self.noise_cutoff)?;
        validate_fraction("dataset.test_fraction", self.test_fraction)?;
        self.ranges.validate()?;
        self.calibration.validate()?;
        self.forest.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = TrainingSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.samples, 500);
        assert_eq!(settings.ranges.age, SampleRange::new(25, 80));
    }

    #[test]
    fn test_rejects_out_of_code_ranges() {
        let mut settings = TrainingSettings::default();
        settings.ranges.chest_pain = SampleRange::new(0, 6);
        assert!(settings.validate().is_err());

        let mut settings = TrainingSettings::default();
        settings.calibration.age_scale = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_weights_and_offsets() {
        let mut calibration = Calibration::default();
        calibration.sex_weight = f64::NAN;
        assert!(calibration.validate().is_err());

        let mut calibration = Calibration::default();
        calibration.cholesterol_offset = f64::INFINITY;
        let err = calibration.validate().unwrap_err();
        assert!(matches!(
            err,
            RiskError::InvalidConfigValueError { ref field, .. } if field == "calibration.cholesterol_offset"
        ));
    }
}
