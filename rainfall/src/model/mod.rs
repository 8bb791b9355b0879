pub mod artifacts;
mod fitted;
pub mod trainer;

pub use artifacts::ArtifactPaths;
pub use fitted::FittedModel;
pub use trainer::{fit, train, TrainOptions, TrainingReport};
