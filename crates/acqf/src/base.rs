use crate::errors::{AcqfError, Result};
use gpbo_gp::kernel::kernel;
use gpbo_gp::{posterior, posterior_gradients, KernelParams, PosteriorGradients};
use gpbo_space::SearchSpace;
use linfa_linalg::{cholesky::*, triangular::*, LinalgError};
use log::debug;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Data, Ix1, Ix2};
use std::time::Instant;

/// State shared by every acquisition function: the training data and the
/// inverse of the regularized training covariance matrix `K(X, X) + noise_var * I`.
///
/// The inverse is computed once at construction. An `AcqfBase` is never
/// mutated afterwards: a new one has to be built when X or Y changes.
#[derive(Clone, Debug)]
pub struct AcqfBase {
    kernel_params: KernelParams<f64>,
    search_space: SearchSpace<f64>,
    x: Array2<f64>,
    y: Array1<f64>,
    is_categorical: Array1<bool>,
    cov_y_y_inv: Array2<f64>,
    cov_y_y_inv_y: Array1<f64>,
}

impl AcqfBase {
    /// Build the base from kernel hyperparameters, the search space and
    /// `n` observed points `x` (n, d) with their values `y` (n,), x being
    /// expressed in the normalized space.
    pub fn new(
        kernel_params: KernelParams<f64>,
        search_space: SearchSpace<f64>,
        x: &ArrayBase<impl Data<Elem = f64>, Ix2>,
        y: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    ) -> Result<Self> {
        let (n, d) = x.dim();
        if n == 0 {
            return Err(AcqfError::InvalidValueError(
                "at least one observation is required".to_string(),
            ));
        }
        if y.len() != n {
            return Err(AcqfError::InvalidValueError(format!(
                "{n} observed points but {} observed values",
                y.len()
            )));
        }
        if d != search_space.dim() || d != kernel_params.dim() {
            return Err(AcqfError::InvalidValueError(format!(
                "observed points have {d} components, search space {}, kernel lengthscales {}",
                search_space.dim(),
                kernel_params.dim()
            )));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(AcqfError::InvalidValueError(
                "observed points and values should be finite".to_string(),
            ));
        }

        let now = Instant::now();
        let is_categorical = search_space.is_categorical();
        let mut cov = kernel(&is_categorical, &kernel_params, x, x);
        let noise_var = kernel_params.noise_var();
        cov.diag_mut().mapv_inplace(|v| v + noise_var);

        // C^-1 = L^-T . L^-1
        let chol = cov.cholesky()?;
        let chol_inv = chol.solve_triangular(&Array2::<f64>::eye(n), UPLO::Lower)?;
        let inv = chol.t().solve_triangular(&chol_inv, UPLO::Upper)?;
        if inv.iter().any(|v| !v.is_finite()) {
            return Err(LinalgError::NotPositiveDefinite.into());
        }
        // rounding leaves the product slightly asymmetric
        let cov_y_y_inv = (&inv + &inv.t()) * 0.5;
        let cov_y_y_inv_y = cov_y_y_inv.dot(y);
        debug!(
            "Covariance inverse with n={n}, d={d} computed in {:?}",
            now.elapsed()
        );

        Ok(AcqfBase {
            kernel_params,
            search_space,
            x: x.to_owned(),
            y: y.to_owned(),
            is_categorical,
            cov_y_y_inv,
            cov_y_y_inv_y,
        })
    }

    /// Kernel hyperparameters
    pub fn kernel_params(&self) -> &KernelParams<f64> {
        &self.kernel_params
    }

    /// Search space of the candidate points
    pub fn search_space(&self) -> &SearchSpace<f64> {
        &self.search_space
    }

    /// Observed points (n, d)
    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    /// Observed values (n,)
    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    /// Categorical dimension mask derived from the search space
    pub fn is_categorical(&self) -> &Array1<bool> {
        &self.is_categorical
    }

    /// `(K(X, X) + noise_var * I)^-1`
    pub fn cov_y_y_inv(&self) -> &Array2<f64> {
        &self.cov_y_y_inv
    }

    /// `(K(X, X) + noise_var * I)^-1 . Y`
    pub fn cov_y_y_inv_y(&self) -> &Array1<f64> {
        &self.cov_y_y_inv_y
    }

    /// Number of input dimensions
    pub fn dim(&self) -> usize {
        self.x.ncols()
    }

    /// Posterior means and variances at a (m, d) batch of points.
    ///
    /// Variances are not stabilized and may be slightly negative.
    pub fn posterior_moments(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
        self.check_point_dim(x.ncols())?;
        let moments = posterior(
            &self.kernel_params,
            &self.x,
            &self.is_categorical,
            &self.cov_y_y_inv,
            &self.cov_y_y_inv_y,
            x,
        )?;
        Ok(moments)
    }

    /// Posterior mean and variance at a single point with their gradients
    pub fn posterior_moments_with_gradients(
        &self,
        x: &ArrayView1<f64>,
    ) -> Result<PosteriorGradients<f64>> {
        self.check_point_dim(x.len())?;
        let grads = posterior_gradients(
            &self.kernel_params,
            &self.x,
            &self.is_categorical,
            &self.cov_y_y_inv,
            &self.cov_y_y_inv_y,
            x,
        )?;
        Ok(grads)
    }

    fn check_point_dim(&self, nx: usize) -> Result<()> {
        if nx != self.dim() {
            return Err(AcqfError::InvalidValueError(format!(
                "candidate points should have {} components, got {nx}",
                self.dim()
            )));
        }
        Ok(())
    }
}
