use crate::domain::model::Dataset;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices of a seeded train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Shuffles `0..n` and holds out `ceil(n * test_fraction)` rows, keeping
    /// at least one row on each side when `n >= 2`.
    pub fn new(n: usize, test_fraction: f64, seed: u64) -> Self {
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let mut test_len = (n as f64 * test_fraction).ceil() as usize;
        if n >= 2 {
            test_len = test_len.clamp(1, n - 1);
        } else {
            test_len = 0;
        }

        let test = indices.split_off(n - test_len);
        Self {
            train: indices,
            test,
        }
    }

    pub fn select(&self, dataset: &Dataset, test: bool) -> (Vec<Vec<f64>>, Vec<bool>) {
        let picked = if test { &self.test } else { &self.train };
        let x = picked.iter().map(|&i| dataset.rows[i].to_row()).collect();
        let y = picked.iter().map(|&i| dataset.labels[i]).collect();
        (x, y)
    }
}
