//! Bagged CART classifier for binary labels.
//!
//! Trees split on Gini impurity with midpoint thresholds and store class
//! counts in their leaves. The forest averages leaf frequencies and reports a
//! positive label when that average exceeds one half.

mod ensemble;
mod tree;

pub use ensemble::RandomForest;
pub use tree::{DecisionTree, Node, TreeParams};

use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, Validate};
use serde::{Deserialize, Serialize};

/// Candidate features examined per split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxFeatures {
    Sqrt,
    All,
    Fixed(usize),
}

impl MaxFeatures {
    pub fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Fixed(k) => k,
        };
        k.clamp(1, n_features.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            trees: 100,
            max_depth: None,
            min_samples_split: 2,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
        }
    }
}

impl Validate for ForestConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("forest.trees", self.trees, 1)?;
        validate_positive_number("forest.min_samples_split", self.min_samples_split, 2)?;
        if let Some(depth) = self.max_depth {
            validate_positive_number("forest.max_depth", depth, 1)?;
        }
        if let MaxFeatures::Fixed(k) = self.max_features {
            validate_positive_number("forest.max_features", k, 1)?;
        }
        Ok(())
    }
}

pub(crate) fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    2.0 * p * (1.0 - p)
}
