use thiserror::Error;

/// A result type for search space definition
pub type Result<T> = std::result::Result<T, SpaceError>;

/// An error when defining a [`SearchSpace`](crate::SearchSpace)
#[derive(Error, Debug)]
pub enum SpaceError {
    /// When dimensions of the given definition are not consistent
    #[error("Dimension mismatch: {0}")]
    DimensionError(String),
    /// When a bound or a step is invalid
    #[error("InvalidValue error: {0}")]
    InvalidValueError(String),
}
