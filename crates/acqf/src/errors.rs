use thiserror::Error;

/// A result type for acquisition function computations
pub type Result<T> = std::result::Result<T, AcqfError>;

/// An error when building or evaluating an acquisition function
#[derive(Error, Debug)]
pub enum AcqfError {
    /// When configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfigError(String),
    /// When given inputs have unexpected shapes or values
    #[error("Value error: {0}")]
    InvalidValueError(String),
    /// When a gradient cannot be computed at the requested point
    #[error("Differentiation error: {0}")]
    DifferentiationError(String),
    /// When kernel or posterior computation fails
    #[error("GP error")]
    GpError(#[from] gpbo_gp::GpError),
    /// When search space is ill-defined
    #[error("Search space error")]
    SpaceError(#[from] gpbo_space::SpaceError),
    /// When the inversion of the covariance matrix fails
    #[error(transparent)]
    LinalgError(#[from] linfa_linalg::LinalgError),
    /// When no maximum can be found among acquisition values
    #[error(transparent)]
    EmptyInput(#[from] ndarray_stats::errors::EmptyInput),
}
