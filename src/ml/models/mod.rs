pub mod forest;
pub mod logistic;
pub mod markov;
pub mod tree;

pub use forest::{EnsembleTreeStrategy, RandomForest};
pub use logistic::{GradientClassifierStrategy, LogisticModel};
pub use markov::{MarkovTransitionStrategy, TransitionMatrix};
pub use tree::{DecisionTree, TreeConfig, TreeNode};
