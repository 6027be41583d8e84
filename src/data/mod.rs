pub mod generator;
pub mod builder;

pub use generator::SeriesGenerator;
pub use builder::{DatasetBuilder, DEFAULT_SUCCESS_RATE};
