use crate::config::ForestConfig;
use crate::ml::features::FeatureVector;
use crate::ml::labeling::LabeledSample;
use crate::types::{DRAW_SIZE, UNIVERSE_SIZE};
use rand::seq::index;
use rand::Rng;

/// Probability used by a node that has no samples at all
const BASE_RATE: f64 = DRAW_SIZE as f64 / UNIVERSE_SIZE as f64;
const MIN_IMPURITY_DECREASE: f64 = 1e-12;

/// Arena node; children are indices into `DecisionTree::nodes`.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Leaf {
        probability: f64,
    },
    /// `features[feature] <= threshold` goes left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub features_per_split: usize,
    pub thresholds_per_feature: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::from(&ForestConfig::default())
    }
}

impl From<&ForestConfig> for TreeConfig {
    fn from(config: &ForestConfig) -> Self {
        let default_features = (FeatureVector::LEN as f64).sqrt().ceil() as usize;
        Self {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            features_per_split: config
                .features_per_split
                .unwrap_or(default_features)
                .clamp(1, FeatureVector::LEN),
            thresholds_per_feature: config.thresholds_per_feature.max(1),
        }
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// Binary classification tree grown with Gini impurity
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Grow a tree on `samples[i]` for every `i` in `indices` (duplicates allowed).
    pub fn fit<R: Rng + ?Sized>(
        samples: &[LabeledSample],
        indices: &[usize],
        config: &TreeConfig,
        rng: &mut R,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(samples, indices, 0, config, rng);
        tree
    }

    fn grow<R: Rng + ?Sized>(
        &mut self,
        samples: &[LabeledSample],
        indices: &[usize],
        depth: usize,
        config: &TreeConfig,
        rng: &mut R,
    ) -> usize {
        let probability = mean_label(samples, indices);
        let node = self.nodes.len();
        self.nodes.push(TreeNode::Leaf { probability });

        let pure = probability <= 0.0 || probability >= 1.0;
        if depth >= config.max_depth || indices.len() < config.min_samples_split || pure {
            return node;
        }

        let Some(split) = best_split(samples, indices, config, rng) else {
            return node;
        };
        if gini(probability) - split.impurity < MIN_IMPURITY_DECREASE {
            return node;
        }

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| samples[i].features[split.feature] <= split.threshold);

        let left = self.grow(samples, &left_indices, depth + 1, config, rng);
        let right = self.grow(samples, &right_indices, depth + 1, config, rng);
        self.nodes[node] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node
    }

    /// Leaf probability reached by `features`.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { probability }) => return *probability,
                Some(TreeNode::Split { feature, threshold, left, right }) => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    idx = if value <= *threshold { *left } else { *right };
                }
                None => return BASE_RATE,
            }
        }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }

    /// Longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        self.node_depth(0)
    }

    fn node_depth(&self, idx: usize) -> usize {
        match &self.nodes[idx] {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + self.node_depth(*left).max(self.node_depth(*right)),
        }
    }
}

fn mean_label(samples: &[LabeledSample], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return BASE_RATE;
    }
    let positives = indices.iter().filter(|&&i| samples[i].label).count();
    positives as f64 / indices.len() as f64
}

fn gini(p: f64) -> f64 {
    2.0 * p * (1.0 - p)
}

/// Lowest weighted Gini over a random feature subset, thresholds drawn from the node's own values.
fn best_split<R: Rng + ?Sized>(
    samples: &[LabeledSample],
    indices: &[usize],
    config: &TreeConfig,
    rng: &mut R,
) -> Option<SplitCandidate> {
    let total = indices.len() as f64;
    let mut best: Option<SplitCandidate> = None;

    for feature in index::sample(rng, FeatureVector::LEN, config.features_per_split).into_iter() {
        for _ in 0..config.thresholds_per_feature {
            let pick = indices[rng.gen_range(0..indices.len())];
            let threshold = samples[pick].features[feature];

            let (mut left_n, mut left_pos, mut right_n, mut right_pos) = (0usize, 0usize, 0usize, 0usize);
            for &i in indices {
                let sample = &samples[i];
                if sample.features[feature] <= threshold {
                    left_n += 1;
                    left_pos += usize::from(sample.label);
                } else {
                    right_n += 1;
                    right_pos += usize::from(sample.label);
                }
            }
            if left_n == 0 || right_n == 0 {
                continue;
            }

            let impurity = (left_n as f64 * gini(left_pos as f64 / left_n as f64)
                + right_n as f64 * gini(right_pos as f64 / right_n as f64))
                / total;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                best = Some(SplitCandidate { feature, threshold, impurity });
            }
        }
    }

    best
}
