pub mod accumulator;
pub mod cpi;
pub mod weight;

pub use cpi::*;
pub use weight::*;
