//! CART regression tree base learner
//!
//! Fits axis-aligned splits minimizing squared error, with thresholds at
//! midpoints of adjacent sorted feature values. Nodes live in an arena
//! with the root at index 0. The seeded RNG shuffles the order features
//! are evaluated in, which makes split tie-breaking a function of the
//! seed and nothing else.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Fit a tree on the full sample set
    ///
    /// `max_depth` bounds split depth (a lone root is depth 0) and every
    /// split leaves at least `min_samples_leaf` samples on each side.
    pub fn fit(
        rows: &[Vec<f64>],
        targets: &[f64],
        max_depth: usize,
        min_samples_leaf: usize,
        rng: &mut StdRng,
    ) -> Self {
        if rows.is_empty() {
            return RegressionTree {
                nodes: vec![TreeNode::Leaf { value: 0.0 }],
            };
        }

        let mut builder = TreeBuilder {
            rows,
            targets,
            max_depth,
            min_samples_leaf: min_samples_leaf.max(1),
            nodes: Vec::new(),
        };
        let indices: Vec<usize> = (0..rows.len()).collect();
        builder.build(indices, 0, rng);

        RegressionTree {
            nodes: builder.nodes,
        }
    }

    /// Predicted value for one feature row
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Index of the leaf node a row lands in
    pub fn apply(&self, row: &[f64]) -> usize {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                TreeNode::Leaf { .. } => return node,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Overwrite a leaf's value; no-op on split nodes
    pub fn set_leaf_value(&mut self, node: usize, value: f64) {
        if let TreeNode::Leaf { value: v } = &mut self.nodes[node] {
            *v = value;
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf split count
    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, node: usize) -> usize {
        match &self.nodes[node] {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => {
                1 + self.depth_from(*left).max(self.depth_from(*right))
            }
        }
    }
}

struct TreeBuilder<'a> {
    rows: &'a [Vec<f64>],
    targets: &'a [f64],
    max_depth: usize,
    min_samples_leaf: usize,
    nodes: Vec<TreeNode>,
}

impl TreeBuilder<'_> {
    fn build(&mut self, indices: Vec<usize>, depth: usize, rng: &mut StdRng) -> usize {
        let mean =
            indices.iter().map(|&i| self.targets[i]).sum::<f64>() / indices.len() as f64;

        let splittable = depth < self.max_depth
            && indices.len() >= 2 * self.min_samples_leaf
            && !self.is_pure(&indices);

        if splittable {
            if let Some((feature, threshold)) = self.best_split(&indices, rng) {
                let node = self.nodes.len();
                // Placeholder keeps the parent ahead of its children in the arena
                self.nodes.push(TreeNode::Leaf { value: mean });

                let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
                    .into_iter()
                    .partition(|&i| self.rows[i][feature] <= threshold);

                let left = self.build(left_indices, depth + 1, rng);
                let right = self.build(right_indices, depth + 1, rng);
                self.nodes[node] = TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                };
                return node;
            }
        }

        let node = self.nodes.len();
        self.nodes.push(TreeNode::Leaf { value: mean });
        node
    }

    fn is_pure(&self, indices: &[usize]) -> bool {
        let first = self.targets[indices[0]];
        indices.iter().all(|&i| self.targets[i] == first)
    }

    /// Best squared-error split over all features, or None when no split
    /// strictly reduces the error
    fn best_split(&self, indices: &[usize], rng: &mut StdRng) -> Option<(usize, f64)> {
        let n = indices.len();
        let n_features = self.rows[indices[0]].len();

        let mut feature_order: Vec<usize> = (0..n_features).collect();
        feature_order.shuffle(rng);

        let total: f64 = indices.iter().map(|&i| self.targets[i]).sum();
        // Error reduction > 0 is equivalent to beating the parent's score
        let mut best_score = total * total / n as f64;
        let mut best = None;

        for &feature in &feature_order {
            let mut sorted = indices.to_vec();
            sorted.sort_by(|&a, &b| self.rows[a][feature].total_cmp(&self.rows[b][feature]));

            let mut left_sum = 0.0;
            for (pos, &idx) in sorted.iter().enumerate().take(n - 1) {
                left_sum += self.targets[idx];

                let left_n = pos + 1;
                let right_n = n - left_n;
                if left_n < self.min_samples_leaf || right_n < self.min_samples_leaf {
                    continue;
                }

                let lo = self.rows[idx][feature];
                let hi = self.rows[sorted[pos + 1]][feature];
                if lo == hi {
                    continue;
                }

                let right_sum = total - left_sum;
                let score = left_sum * left_sum / left_n as f64
                    + right_sum * right_sum / right_n as f64;
                if score > best_score {
                    best_score = score;
                    let mut threshold = (lo + hi) / 2.0;
                    // Midpoint can round up onto the right value for
                    // adjacent floats; fall back to the left value
                    if threshold == hi {
                        threshold = lo;
                    }
                    best = Some((feature, threshold));
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

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn column(values: &[f64]) -> Vec<Vec<f64>> {
        values.iter().map(|&v| vec![v]).collect()
    }

    #[test]
    fn test_constant_targets_give_single_leaf() {
        let rows = column(&[1.0, 2.0, 3.0]);
        let tree = RegressionTree::fit(&rows, &[5.0, 5.0, 5.0], 3, 1, &mut rng());

        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict_row(&[2.0]), 5.0);
    }

    #[test]
    fn test_perfect_split() {
        let rows = column(&[1.0, 2.0, 3.0, 4.0]);
        let targets = [0.0, 0.0, 1.0, 1.0];
        let tree = RegressionTree::fit(&rows, &targets, 3, 1, &mut rng());

        assert_eq!(tree.predict_row(&[1.5]), 0.0);
        assert_eq!(tree.predict_row(&[3.5]), 1.0);
    }

    #[test]
    fn test_threshold_at_midpoint_routes_left_on_equality() {
        let rows = column(&[1.0, 3.0]);
        let tree = RegressionTree::fit(&rows, &[0.0, 1.0], 1, 1, &mut rng());

        // Split at (1 + 3) / 2 = 2, with x <= 2 going left
        assert_eq!(tree.predict_row(&[2.0]), 0.0);
        assert_eq!(tree.predict_row(&[2.0001]), 1.0);
    }

    #[test]
    fn test_max_depth_bounds_tree() {
        let rows = column(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let targets = [1.0, 7.0, 2.0, 9.0, 3.0, 8.0, 4.0, 6.0];

        let tree = RegressionTree::fit(&rows, &targets, 2, 1, &mut rng());
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn test_min_samples_leaf_blocks_small_splits() {
        let rows = column(&[1.0, 2.0, 3.0, 4.0]);
        let targets = [0.0, 0.0, 1.0, 1.0];

        // Each side would need 3 samples, so only a root leaf fits
        let tree = RegressionTree::fit(&rows, &targets, 3, 3, &mut rng());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict_row(&[1.0]), 0.5);
    }

    #[test]
    fn test_identical_feature_values_give_leaf() {
        let rows = column(&[2.0, 2.0, 2.0, 2.0]);
        let targets = [0.0, 1.0, 0.0, 1.0];

        let tree = RegressionTree::fit(&rows, &targets, 3, 1, &mut rng());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict_row(&[2.0]), 0.5);
    }

    #[test]
    fn test_leaf_value_override() {
        let rows = column(&[1.0, 3.0]);
        let mut tree = RegressionTree::fit(&rows, &[0.0, 1.0], 1, 1, &mut rng());

        let leaf = tree.apply(&[1.0]);
        tree.set_leaf_value(leaf, -2.5);
        assert_eq!(tree.predict_row(&[1.0]), -2.5);
        assert_eq!(tree.predict_row(&[3.0]), 1.0);
    }

    #[test]
    fn test_same_seed_same_tree() {
        let rows: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![i as f64, (i * 7 % 13) as f64, (i * 3 % 5) as f64])
            .collect();
        let targets: Vec<f64> = (0..20).map(|i| ((i * 11) % 17) as f64).collect();

        let a = RegressionTree::fit(&rows, &targets, 3, 1, &mut rng());
        let b = RegressionTree::fit(&rows, &targets, 3, 1, &mut rng());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_empty_input_gives_zero_leaf() {
        let tree = RegressionTree::fit(&[], &[], 3, 1, &mut rng());
        assert_eq!(tree.predict_row(&[1.0]), 0.0);
    }
}
