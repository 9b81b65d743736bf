mod band;
mod solve;
mod system;

pub use band::*;
pub use solve::*;
pub use system::*;

pub mod config;
pub mod layout;
