pub mod constraints;
pub mod scorer;

pub use constraints::{longest_run, ConstraintViolation, HardConstraints};
pub use scorer::{ScoreWeights, ScoringContext, ScoringFunction};
