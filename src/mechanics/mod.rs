pub mod control;
pub mod econ;
pub mod format;
pub mod mining;

pub use control::*;
pub use econ::*;
pub use mining::*;
