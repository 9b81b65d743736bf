#[derive(Debug, derive_more::Display)]
pub struct AppError {
    pub msg: String
}

impl std::error::Error for AppError {}

macro_rules! err {
    ($($arg:tt)*) => {{
        use crate::app::err::*;
        let e = AppError { msg: format!($($arg)*) };
        Err( e.into() )
    }}
}

macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {{
        if !$cond {
            return err!($($arg)*);
        }
    }}
}

pub(crate) use {err, ensure};
