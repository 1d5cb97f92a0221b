use crate::utils::error::RiskError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names and order of the training schema.
pub const FEATURE_COLUMNS: [&str; 5] = ["age", "sex", "cp", "trestbps", "chol"];

pub const FEATURE_COUNT: usize = FEATURE_COLUMNS.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Sex {
    Female = 0,
    Male = 1,
}

impl TryFrom<u8> for Sex {
    type Error = RiskError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Sex::Female),
            1 => Ok(Sex::Male),
            other => Err(RiskError::validation(format!(
                "sex must be 0 (female) or 1 (male), got {}",
                other
            ))),
        }
    }
}

impl From<Sex> for u8 {
    fn from(sex: Sex) -> Self {
        sex as u8
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Female => write!(f, "Female"),
            Sex::Male => write!(f, "Male"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChestPain {
    None = 0,
    TypicalAngina = 1,
    AtypicalAngina = 2,
    NonAnginal = 3,
}

impl TryFrom<u8> for ChestPain {
    type Error = RiskError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ChestPain::None),
            1 => Ok(ChestPain::TypicalAngina),
            2 => Ok(ChestPain::AtypicalAngina),
            3 => Ok(ChestPain::NonAnginal),
            other => Err(RiskError::validation(format!(
                "chest pain type must be between 0 and 3, got {}",
                other
            ))),
        }
    }
}

impl From<ChestPain> for u8 {
    fn from(cp: ChestPain) -> Self {
        cp as u8
    }
}

impl fmt::Display for ChestPain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChestPain::None => "No Pain",
            ChestPain::TypicalAngina => "Typical Angina",
            ChestPain::AtypicalAngina => "Atypical Angina",
            ChestPain::NonAnginal => "Non-anginal Pain",
        };
        write!(f, "{} ({})", label, *self as u8)
    }
}

/// One person's inputs to the classifier. Serialized field names follow
/// `FEATURE_COLUMNS`, so a CSV with that header decodes directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub age: u32,
    pub sex: Sex,
    #[serde(rename = "cp")]
    pub chest_pain: ChestPain,
    #[serde(rename = "trestbps")]
    pub blood_pressure: u32,
    #[serde(rename = "chol")]
    pub cholesterol: u32,
}

impl FeatureVector {
    pub fn to_row(&self) -> Vec<f64> {
        vec![
            self.age as f64,
            u8::from(self.sex) as f64,
            u8::from(self.chest_pain) as f64,
            self.blood_pressure as f64,
            self.cholesterol as f64,
        ]
    }
}

/// Labelled synthetic table produced before fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub rows: Vec<FeatureVector>,
    pub labels: Vec<bool>,
    /// How many labels the noise step inverted.
    pub flipped: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn positive_rate(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.labels.iter().filter(|&&l| l).count() as f64 / self.labels.len() as f64
    }

    pub fn feature_matrix(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(FeatureVector::to_row).collect()
    }
}

/// Row shape used for `dataset.csv`. csv cannot serialize flattened
/// structs, so the feature columns are spelled out.
#[derive(Debug, Serialize, Deserialize)]
pub struct LabelledRow {
    pub age: u32,
    pub sex: Sex,
    pub cp: ChestPain,
    pub trestbps: u32,
    pub chol: u32,
    pub target: u8,
}

impl LabelledRow {
    pub fn new(features: &FeatureVector, label: bool) -> Self {
        Self {
            age: features.age,
            sex: features.sex,
            cp: features.chest_pain,
            trestbps: features.blood_pressure,
            chol: features.cholesterol,
            target: label as u8,
        }
    }
}
