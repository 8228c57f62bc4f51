pub mod dataset;

pub use dataset::{build_dataset, training_positions, LabeledSample};
