use super::gini;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Arena node; children are indices into `DecisionTree::nodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        positives: usize,
        total: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct Candidate {
    feature: usize,
    threshold: f64,
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [bool],
    params: &'a TreeParams,
    n_features: usize,
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grows a tree over the rows named by `sample` (duplicates allowed).
    pub fn fit(
        x: &[Vec<f64>],
        y: &[bool],
        sample: Vec<usize>,
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let mut builder = TreeBuilder {
            x,
            y,
            params,
            n_features: x.first().map_or(0, Vec::len),
            nodes: Vec::new(),
        };
        builder.grow(sample, 0, rng);
        Self {
            nodes: builder.nodes,
        }
    }

    /// Fraction of positive training rows in the leaf `row` falls into.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { positives, total } => {
                    return if *total == 0 {
                        0.0
                    } else {
                        *positives as f64 / *total as f64
                    };
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match &nodes[index] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Checks a decoded arena before it is walked: at least one node, split
    /// features below `n_features`, and every child stored after its parent.
    pub fn check_structure(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= n_features {
                    return Err(format!(
                        "node {} splits on feature {} of {}",
                        index, feature, n_features
                    ));
                }
                for child in [*left, *right] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(format!(
                            "node {} points at child {} (arena holds {})",
                            index,
                            child,
                            self.nodes.len()
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

impl TreeBuilder<'_> {
    fn grow(&mut self, indices: Vec<usize>, depth: usize, rng: &mut StdRng) -> usize {
        let total = indices.len();
        let positives = indices.iter().filter(|&&i| self.y[i]).count();

        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { positives, total });

        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if depth_reached
            || total < self.params.min_samples_split
            || positives == 0
            || positives == total
        {
            return id;
        }

        let Some(candidate) = self.best_split(&indices, positives, rng) else {
            return id;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.x[i][candidate.feature] <= candidate.threshold);

        let left_id = self.grow(left, depth + 1, rng);
        let right_id = self.grow(right, depth + 1, rng);
        self.nodes[id] = Node::Split {
            feature: candidate.feature,
            threshold: candidate.threshold,
            left: left_id,
            right: right_id,
        };
        id
    }

    /// Visits features in random order until `max_features` non-constant
    /// ones have been scanned; keeps the split with the lowest weighted Gini.
    fn best_split(&self, indices: &[usize], positives: usize, rng: &mut StdRng) -> Option<Candidate> {
        let total = indices.len();
        let mut best_impurity = gini(positives, total);
        let mut best: Option<Candidate> = None;

        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(rng);

        let mut sorted = indices.to_vec();
        let mut scanned = 0;

        for feature in features {
            if scanned >= self.params.max_features {
                break;
            }
            sorted.sort_by(|&a, &b| self.x[a][feature].total_cmp(&self.x[b][feature]));

            let first = self.x[sorted[0]][feature];
            let last = self.x[sorted[total - 1]][feature];
            if first == last {
                continue;
            }
            scanned += 1;

            let mut left_positives = 0;
            for k in 0..total - 1 {
                if self.y[sorted[k]] {
                    left_positives += 1;
                }
                let current = self.x[sorted[k]][feature];
                let next = self.x[sorted[k + 1]][feature];
                if current == next {
                    continue;
                }

                let left_total = k + 1;
                let right_total = total - left_total;
                let impurity = (left_total as f64 * gini(left_positives, left_total)
                    + right_total as f64 * gini(positives - left_positives, right_total))
                    / total as f64;

                if impurity < best_impurity - 1e-12 {
                    best_impurity = impurity;
                    best = Some(Candidate {
                        feature,
                        threshold: (current + next) / 2.0,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn params() -> TreeParams {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            max_features: 2,
        }
    }

    #[test]
    fn test_separable_data_fits_exactly() {
        let x: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, 0.0]).collect();
        let y: Vec<bool> = (0..20).map(|i| i >= 10).collect();
        let mut rng = StdRng::seed_from_u64(0);

        let tree = DecisionTree::fit(&x, &y, (0..20).collect(), &params(), &mut rng);

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict_proba(&[3.0, 0.0]), 0.0);
        assert_eq!(tree.predict_proba(&[15.0, 0.0]), 1.0);
        match &tree.nodes()[0] {
            Node::Split {
                feature, threshold, ..
            } => {
                assert_eq!(*feature, 0);
                assert_eq!(*threshold, 9.5);
            }
            other => panic!("expected split at root, got {:?}", other),
        }
    }

    #[test]
    fn test_pure_node_is_leaf() {
        let x = vec![vec![1.0], vec![2.0], vec![3.0]];
        let y = vec![true, true, true];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = DecisionTree::fit(&x, &y, vec![0, 1, 2], &params(), &mut rng);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_proba(&[10.0]), 1.0);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x: Vec<Vec<f64>> = (0..16).map(|i| vec![i as f64]).collect();
        let y: Vec<bool> = (0..16).map(|i| i % 2 == 0).collect();
        let mut rng = StdRng::seed_from_u64(0);
        let limited = TreeParams {
            max_depth: Some(2),
            ..params()
        };
        let tree = DecisionTree::fit(&x, &y, (0..16).collect(), &limited, &mut rng);
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn test_fitted_tree_passes_structure_check() {
        let x: Vec<Vec<f64>> = (0..30).map(|i| vec![i as f64, (i % 7) as f64]).collect();
        let y: Vec<bool> = (0..30).map(|i| i % 3 == 0).collect();
        let mut rng = StdRng::seed_from_u64(5);
        let tree = DecisionTree::fit(&x, &y, (0..30).collect(), &params(), &mut rng);
        assert!(tree.check_structure(2).is_ok());
        assert!(tree.node_count() > 1);
        assert!(tree.check_structure(0).is_err());
    }

    #[test]
    fn test_structure_check_rejects_bad_arenas() {
        let leaf = Node::Leaf {
            positives: 1,
            total: 2,
        };
        let split = |feature, left, right| Node::Split {
            feature,
            threshold: 0.5,
            left,
            right,
        };

        let empty = DecisionTree { nodes: Vec::new() };
        assert!(empty.check_structure(1).is_err());

        let cyclic = DecisionTree {
            nodes: vec![split(0, 0, 1), leaf.clone()],
        };
        assert!(cyclic.check_structure(1).is_err());

        let dangling = DecisionTree {
            nodes: vec![split(0, 1, 9), leaf.clone(), leaf.clone()],
        };
        assert!(dangling.check_structure(1).is_err());

        let wide = DecisionTree {
            nodes: vec![split(3, 1, 2), leaf.clone(), leaf],
        };
        assert!(wide.check_structure(1).is_err());
    }
}
