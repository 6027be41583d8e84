pub mod runtime;
pub mod loader;

pub use runtime::*;
pub use loader::load;
