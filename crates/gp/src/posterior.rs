//! GP posterior moments given a precomputed inverse of the regularized
//! training covariance matrix.
//!
//! With `C = (K(X, X) + noise_var * I)^-1` and `alpha = C . y`, the posterior at `x` is
//!
//! * `mean(x) = k(x, X) . alpha`
//! * `var(x) = kernel_scale - k(x, X) . C . k(X, x)`

use crate::errors::{GpError, Result};
use crate::kernel::{kernel, kernel_valjac};
use crate::parameters::KernelParams;
use linfa::Float;
use ndarray::{Array1, ArrayBase, Axis, Data, Ix1, Ix2};

fn check_training_data<F: Float>(
    params: &KernelParams<F>,
    xtrain: &ArrayBase<impl Data<Elem = F>, Ix2>,
    is_categorical: &ArrayBase<impl Data<Elem = bool>, Ix1>,
    cov_inv: &ArrayBase<impl Data<Elem = F>, Ix2>,
    cov_inv_y: &ArrayBase<impl Data<Elem = F>, Ix1>,
    nx: usize,
) -> Result<()> {
    let n = xtrain.nrows();
    if cov_inv.dim() != (n, n) || cov_inv_y.len() != n {
        return Err(GpError::DimensionError(format!(
            "expected ({n}, {n}) inverse covariance and ({n},) weights, got {:?} and ({},)",
            cov_inv.dim(),
            cov_inv_y.len()
        )));
    }
    let d = xtrain.ncols();
    if nx != d || is_categorical.len() != d || params.dim() != d {
        return Err(GpError::DimensionError(format!(
            "query points have {nx} components, training points {d}, mask {}, lengthscales {}",
            is_categorical.len(),
            params.dim()
        )));
    }
    Ok(())
}

/// Compute posterior means and variances at `x` points given as a (m, nx) matrix.
///
/// Returns two `(m,)` vectors. Variances are returned as computed: because of
/// rounding they may be slightly negative, callers should stabilize them
/// before taking a square root or a logarithm.
pub fn posterior<F: Float>(
    params: &KernelParams<F>,
    xtrain: &ArrayBase<impl Data<Elem = F>, Ix2>,
    is_categorical: &ArrayBase<impl Data<Elem = bool>, Ix1>,
    cov_inv: &ArrayBase<impl Data<Elem = F>, Ix2>,
    cov_inv_y: &ArrayBase<impl Data<Elem = F>, Ix1>,
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Result<(Array1<F>, Array1<F>)> {
    check_training_data(
        params,
        xtrain,
        is_categorical,
        cov_inv,
        cov_inv_y,
        x.ncols(),
    )?;

    // (m, n)
    let cov_fx_fxt = kernel(is_categorical, params, x, xtrain);
    let mean = cov_fx_fxt.dot(cov_inv_y);
    let var = (&cov_fx_fxt * &cov_fx_fxt.dot(cov_inv))
        .sum_axis(Axis(1))
        .mapv(|v| params.kernel_scale() - v);
    Ok((mean, var))
}

/// Posterior moments at a single point together with their gradients
#[derive(Clone, Debug)]
pub struct PosteriorGradients<F: Float> {
    /// Posterior mean
    pub mean: F,
    /// Posterior variance
    pub var: F,
    /// Derivatives of the mean wrt x components
    pub mean_grad: Array1<F>,
    /// Derivatives of the variance wrt x components
    pub var_grad: Array1<F>,
}

/// Compute posterior mean and variance at a single `x` point of nx components
/// and their derivatives with respect to the components of `x`.
///
/// Derivatives along categorical components are zero.
pub fn posterior_gradients<F: Float>(
    params: &KernelParams<F>,
    xtrain: &ArrayBase<impl Data<Elem = F>, Ix2>,
    is_categorical: &ArrayBase<impl Data<Elem = bool>, Ix1>,
    cov_inv: &ArrayBase<impl Data<Elem = F>, Ix2>,
    cov_inv_y: &ArrayBase<impl Data<Elem = F>, Ix1>,
    x: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> Result<PosteriorGradients<F>> {
    check_training_data(params, xtrain, is_categorical, cov_inv, cov_inv_y, x.len())?;

    // k: (n,), jac: (n, nx)
    let (k, jac) = kernel_valjac(is_categorical, params, x, xtrain);
    let cov_inv_k = cov_inv.dot(&k);

    let mean = k.dot(cov_inv_y);
    let var = params.kernel_scale() - k.dot(&cov_inv_k);
    let mean_grad = jac.t().dot(cov_inv_y);
    // C being symmetric, d(k.C.k) = 2 (C.k).dk
    let var_grad = jac.t().dot(&cov_inv_k).mapv(|v| F::cast(-2.) * v);

    Ok(PosteriorGradients {
        mean,
        var,
        mean_grad,
        var_grad,
    })
}
