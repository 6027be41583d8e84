pub mod scaler;
pub mod tree;
pub mod classifier;
pub mod model;

pub use classifier::{ClassifierKind, ClassifierParams};
pub use model::{PredictiveModel, TrainingReport};
