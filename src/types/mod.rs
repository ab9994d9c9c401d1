//! Data types for the matrix control.

mod axis;
mod cell;
mod merge;
mod selection;

pub use axis::*;
pub use cell::*;
pub use merge::*;
pub use selection::*;
