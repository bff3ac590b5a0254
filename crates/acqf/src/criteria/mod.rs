//! Available acquisition functions
mod confidence_bound;
mod log_ei;

pub use confidence_bound::{LowerConfidenceBound, UpperConfidenceBound, LCB, UCB};
pub use log_ei::{LogExpectedImprovement, LOG_EI};

use crate::base::AcqfBase;
use crate::errors::{AcqfError, Result};
use gpbo_space::SearchSpace;
use ndarray::{Array1, ArrayView1, ArrayView2, Zip};

/// A trait for acquisition functions which maximum location is expected to be
/// the most promising point to evaluate next.
///
/// Every acquisition function is a scalar formula of the GP posterior
/// mean and variance at the candidate point. Implementors only provide the
/// formula and its partial derivatives, posterior computation and chain rule
/// wrt the candidate components being handled by the provided methods.
pub trait AcquisitionFunction: Sync {
    /// Name of the acquisition function
    fn name(&self) -> &'static str;

    /// Shared training data and covariance inverse
    fn base(&self) -> &AcqfBase;

    /// Acquisition value given the posterior `mean` and variance `var`
    /// at a candidate point. `var` may be slightly negative due to rounding.
    fn value(&self, mean: f64, var: f64) -> f64;

    /// Acquisition value and its partial derivatives wrt `mean` and `var`
    fn value_with_partials(&self, mean: f64, var: f64) -> (f64, f64, f64);

    /// Acquisition values given posterior means and variances of a batch
    /// of candidates, each element being computed with [`Self::value`]
    fn values(&self, mean: &Array1<f64>, var: &Array1<f64>) -> Array1<f64> {
        Zip::from(mean)
            .and(var)
            .par_map_collect(|&m, &s| self.value(m, s))
    }

    /// Search space the candidate points belong to
    fn search_space(&self) -> &SearchSpace<f64> {
        self.base().search_space()
    }

    /// Acquisition values at a (m, d) batch of normalized points
    fn eval_no_grad(&self, x: &ArrayView2<f64>) -> Result<Array1<f64>> {
        let (mean, var) = self.base().posterior_moments(x)?;
        Ok(self.values(&mean, &var))
    }

    /// Acquisition value at a single (d,) point and its gradient wrt the
    /// point components
    fn eval_with_grad(&self, x: &ArrayView1<f64>) -> Result<(f64, Array1<f64>)> {
        let post = self.base().posterior_moments_with_gradients(x)?;
        let (value, d_mean, d_var) = self.value_with_partials(post.mean, post.var);
        let grad = post.mean_grad * d_mean + post.var_grad * d_var;
        if grad.iter().any(|g| g.is_nan()) {
            return Err(AcqfError::DifferentiationError(format!(
                "{} gradient is undefined at {x}",
                self.name()
            )));
        }
        Ok((value, grad))
    }
}

impl std::fmt::Debug for dyn AcquisitionFunction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}
