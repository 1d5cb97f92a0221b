use super::tree::{DecisionTree, TreeParams};
use super::ForestConfig;
use crate::utils::error::{Result, RiskError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

// Spreads consecutive tree indices across the seed space.
const TREE_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn fit(x: &[Vec<f64>], y: &[bool], config: &ForestConfig, seed: u64) -> Result<Self> {
        if x.is_empty() {
            return Err(RiskError::training("no rows to fit"));
        }
        if x.len() != y.len() {
            return Err(RiskError::training(format!(
                "{} rows but {} labels",
                x.len(),
                y.len()
            )));
        }
        let n_features = x[0].len();
        if n_features == 0 {
            return Err(RiskError::training("rows have no features"));
        }
        if let Some(bad) = x.iter().position(|row| row.len() != n_features) {
            return Err(RiskError::training(format!(
                "row {} has {} features, expected {}",
                bad,
                x[bad].len(),
                n_features
            )));
        }

        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            max_features: config.max_features.resolve(n_features),
        };

        let n = x.len();
        let mut trees = Vec::with_capacity(config.trees);
        for t in 0..config.trees {
            let mut rng = StdRng::seed_from_u64(seed ^ (t as u64).wrapping_mul(TREE_SEED_MIX));
            let sample: Vec<usize> = if config.bootstrap {
                (0..n).map(|_| rng.gen_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            trees.push(DecisionTree::fit(x, y, sample, &params, &mut rng));
        }

        tracing::debug!(
            "Fitted {} trees on {} rows x {} features (max_features={})",
            trees.len(),
            n,
            n_features,
            params.max_features
        );

        Ok(Self { n_features, trees })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Rejects a decoded forest that could not be walked safely.
    pub fn check_structure(&self) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.check_structure(self.n_features)
                .map_err(|e| format!("tree {}: {}", index, e))?;
        }
        Ok(())
    }

    /// Mean positive-class frequency over all trees.
    pub fn predict_proba(&self, row: &[f64]) -> Result<f64> {
        self.check_row(row)?;
        if self.trees.is_empty() {
            return Ok(0.0);
        }
        let sum: f64 = self.trees.iter().map(|tree| tree.predict_proba(row)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    pub fn predict(&self, row: &[f64]) -> Result<bool> {
        Ok(self.predict_proba(row)? > 0.5)
    }

    /// Accuracy over `x`/`y`; `None` for an empty set.
    pub fn score(&self, x: &[Vec<f64>], y: &[bool]) -> Result<Option<f64>> {
        if x.is_empty() {
            return Ok(None);
        }
        let mut correct = 0;
        for (row, &label) in x.iter().zip(y) {
            if self.predict(row)? == label {
                correct += 1;
            }
        }
        Ok(Some(correct as f64 / x.len() as f64))
    }

    fn check_row(&self, row: &[f64]) -> Result<()> {
        if row.len() != self.n_features {
            return Err(RiskError::SchemaMismatch {
                expected: format!("{} features", self.n_features),
                found: format!("{} features", row.len()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forest::MaxFeatures;

    fn stripes() -> (Vec<Vec<f64>>, Vec<bool>) {
        let x: Vec<Vec<f64>> = (0..60).map(|i| vec![i as f64, (i % 7) as f64]).collect();
        let y: Vec<bool> = (0..60).map(|i| i >= 30).collect();
        (x, y)
    }

    fn small_config() -> ForestConfig {
        ForestConfig {
            trees: 15,
            max_features: MaxFeatures::All,
            ..ForestConfig::default()
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = stripes();
        let a = RandomForest::fit(&x, &y, &small_config(), 42).unwrap();
        let b = RandomForest::fit(&x, &y, &small_config(), 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.n_trees(), 15);
    }

    #[test]
    fn test_learns_simple_boundary() {
        let (x, y) = stripes();
        let forest = RandomForest::fit(&x, &y, &small_config(), 1).unwrap();
        assert!(!forest.predict(&[2.0, 2.0]).unwrap());
        assert!(forest.predict(&[57.0, 1.0]).unwrap());
        assert!(forest.score(&x, &y).unwrap().unwrap() > 0.95);
    }

    #[test]
    fn test_wrong_row_length_is_schema_mismatch() {
        let (x, y) = stripes();
        let forest = RandomForest::fit(&x, &y, &small_config(), 1).unwrap();
        let err = forest.predict(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, RiskError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_rejects_mismatched_inputs() {
        let x = vec![vec![1.0], vec![2.0]];
        assert!(RandomForest::fit(&x, &[true], &small_config(), 0).is_err());
        assert!(RandomForest::fit(&[], &[], &small_config(), 0).is_err());
    }
}
