//! This library implements the Gaussian Process building blocks required by
//! Bayesian optimization acquisition functions: a [Matérn 5/2](https://en.wikipedia.org/wiki/Mat%C3%A9rn_covariance_function)
//! kernel handling mixed continuous/categorical inputs and the GP posterior
//! moments (mean and variance) with their gradients.
//!
//! The GP hyperparameters are given by [KernelParams], they are not fitted here.
//! Posterior computations expect the inverse of the regularized training
//! covariance matrix `(K(X, X) + noise_var * I)^-1` to be computed once by the caller.
//!
//! Example:
//! ```
//! use gpbo_gp::{kernel::kernel, KernelParams};
//! use ndarray::array;
//!
//! let params = KernelParams::new(&array![1., 2.], 1., 1e-6).expect("valid parameters");
//! let is_categorical = array![false, true];
//! let x = array![[0.1, 0.], [0.7, 1.]];
//! let k = kernel(&is_categorical, &params, &x, &x);
//! assert_eq!(k[[0, 0]], 1.);
//! ```
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod errors;
pub mod kernel;
mod parameters;
mod posterior;

pub use errors::*;
pub use parameters::*;
pub use posterior::*;
