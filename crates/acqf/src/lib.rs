//! This library implements the acquisition functions used to pick the next
//! point to evaluate in a Bayesian optimization loop driven by a Gaussian
//! Process surrogate with a Matérn 5/2 kernel (see [gpbo_gp]).
//!
//! Given the kernel hyperparameters of a fitted GP, the [search space](gpbo_space)
//! and the observed data, an acquisition function caches the inverse of the
//! regularized training covariance matrix once and then evaluates:
//! * values at a batch of candidates ([AcquisitionFunction::eval_no_grad]),
//! * value and gradient at a single candidate ([AcquisitionFunction::eval_with_grad]).
//!
//! Available acquisition functions are:
//! * [LogExpectedImprovement]: log of the expected improvement over the best
//!   observed value, numerically stable for very unlikely improvements,
//! * [UpperConfidenceBound] and [LowerConfidenceBound]: posterior mean plus or
//!   minus the posterior standard deviation weighted by `sqrt(beta)`.
//!
//! Acquisition functions are maximized by random search with [optimize_acqf_sample]
//! or a [SampleOptimizer].
//!
//! # Example
//!
//! ```
//! use gpbo_acqf::{AcquisitionFunction, LogExpectedImprovement, SampleOptimizer};
//! use gpbo_gp::KernelParams;
//! use gpbo_space::{ScaleType, SearchSpace};
//! use ndarray::array;
//! use ndarray_rand::rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256Plus;
//!
//! let kernel_params = KernelParams::new(&array![10.], 1., 1e-6).expect("valid kernel");
//! let space = SearchSpace::new(vec![ScaleType::Linear], &array![[0., 1.]], &array![0.])
//!     .expect("valid search space");
//! let x = array![[0.1], [0.5], [0.9]];
//! let y = array![0.2, 0.8, 0.3];
//!
//! let acqf = LogExpectedImprovement::new(kernel_params, space, &x, &y)
//!     .expect("LogEI built");
//! let (val, grad) = acqf.eval_with_grad(&array![0.3].view()).expect("LogEI gradient");
//! assert_eq!(grad.len(), 1);
//!
//! let (x_best, val_best) = SampleOptimizer::new_with_rng(Xoshiro256Plus::seed_from_u64(42))
//!     .n_samples(256)
//!     .maximize(&acqf)
//!     .expect("LogEI maximized");
//! assert!(val_best.is_finite());
//! println!("LogEI(0.3) = {val}, best LogEI = {val_best} at {x_best}");
//! ```
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod criteria;
pub mod utils;

mod base;
mod errors;
mod optimizers;
mod parameters;

pub use crate::base::*;
pub use crate::criteria::{
    AcquisitionFunction, LogExpectedImprovement, LowerConfidenceBound, UpperConfidenceBound,
};
pub use crate::errors::*;
pub use crate::optimizers::*;
pub use crate::parameters::*;
