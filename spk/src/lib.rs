mod error;
mod vector;

pub use error::*;
pub use vector::*;

pub mod gen;
pub mod util;
