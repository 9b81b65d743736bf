use derive_more::Display;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Error { 
    #[display("invalid argument: {_0}")]
    InvalidArgument(String),

    #[display("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[display("incompatible matrices: (size = {}, k = {}) vs (size = {}, k = {})", lhs.0, lhs.1, rhs.0, rhs.1)]
    IncompatibleMatrices { lhs: (usize, usize), rhs: (usize, usize) },

    #[display("index {index} out of bounds 1..={size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[display("zero pivot at row {row} in stage {stage}")]
    SingularPivot { stage: usize, row: usize },

    #[display("parse error: {_0}")]
    Parse(String),
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {{
        if !$cond { 
            return Err($err);
        }
    }}
}
