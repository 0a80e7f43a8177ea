pub mod loaders;
pub mod export;

pub use loaders::*;
pub use export::*;
