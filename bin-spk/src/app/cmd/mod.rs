pub mod sweep;
pub mod gen;
pub mod solve;
pub mod batch;
