pub mod draw;
pub mod dataset;

pub use draw::*;
pub use dataset::*;
