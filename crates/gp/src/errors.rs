use thiserror::Error;

/// A result type for kernel and posterior computations
pub type Result<T> = std::result::Result<T, GpError>;

/// An error when building [`KernelParams`](crate::KernelParams) or evaluating GP moments
#[derive(Error, Debug)]
pub enum GpError {
    /// When dimensions of given arrays are not consistent
    #[error("Dimension mismatch: {0}")]
    DimensionError(String),
    /// When a parameter has an invalid value
    #[error("InvalidValue error: {0}")]
    InvalidValueError(String),
}
