pub mod errors;
pub mod placement;
pub mod spawning;

pub use placement::*;
pub use spawning::*;
