mod app;
pub(crate) mod err;
pub(crate) mod cmd;
pub(crate) mod utils;

pub use app::*;
