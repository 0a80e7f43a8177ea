pub mod position;
pub mod classification;
pub mod reference;
pub mod store;
pub mod errors;

pub use position::*;
pub use classification::*;
pub use reference::*;
pub use store::*;
pub use errors::*;
