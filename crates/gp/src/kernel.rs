//! Matérn 5/2 kernel with mixed continuous/categorical inputs.
//!
//! For two points `a` and `b`, the weighted squared distance is
//!
//! `d2 = sum_j l_j * diff2_j`
//!
//! where `l_j` is the inverse squared lengthscale of dimension `j` and
//! `diff2_j = (a_j - b_j)^2` for continuous dimensions or `1[a_j != b_j]`
//! for categorical ones. The covariance is then
//!
//! `k(a, b) = kernel_scale * exp(-sqrt(5 d2)) * (5/3 d2 + sqrt(5 d2) + 1)`

use crate::parameters::KernelParams;
use linfa::Float;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Data, Ix1, Ix2, Zip};

/// Matérn 5/2 correlation given the weighted squared distance `d2`
pub fn matern52<F: Float>(d2: F) -> F {
    let sqrt5d = (F::cast(5.) * d2).sqrt();
    (-sqrt5d).exp() * (F::cast(5. / 3.) * d2 + sqrt5d + F::one())
}

/// Derivative of [`matern52`] with respect to the squared distance `d2`.
///
/// Unlike the derivative with respect to the distance itself, this one is
/// well defined at `d2 = 0`.
pub fn matern52_derivative<F: Float>(d2: F) -> F {
    let sqrt5d = (F::cast(5.) * d2).sqrt();
    F::cast(-5. / 6.) * (F::one() + sqrt5d) * (-sqrt5d).exp()
}

fn weighted_squared_distance<F: Float>(
    is_categorical: &ArrayView1<bool>,
    inverse_squared_lengthscales: &ArrayView1<F>,
    a: &ArrayView1<F>,
    b: &ArrayView1<F>,
) -> F {
    let mut d2 = F::zero();
    Zip::from(a)
        .and(b)
        .and(is_categorical)
        .and(inverse_squared_lengthscales)
        .for_each(|&a_j, &b_j, &cat, &l_j| {
            let diff2 = if cat {
                if a_j != b_j {
                    F::one()
                } else {
                    F::zero()
                }
            } else {
                (a_j - b_j) * (a_j - b_j)
            };
            d2 += l_j * diff2;
        });
    d2
}

fn check_dims<F: Float>(ncols: &[usize], mask_len: usize, params: &KernelParams<F>) {
    for &nc in ncols {
        assert!(
            nc == mask_len && nc == params.dim(),
            "kernel: inconsistent dimensions, points have {} components, mask {}, lengthscales {}",
            nc,
            mask_len,
            params.dim()
        );
    }
}

/// Compute the `(na, nb)` covariance matrix between rows of `xa` and rows of `xb`.
///
/// **Panics** if `xa`, `xb`, `is_categorical` and the kernel lengthscales
/// do not share the same dimension.
pub fn kernel<F: Float>(
    is_categorical: &ArrayBase<impl Data<Elem = bool>, Ix1>,
    params: &KernelParams<F>,
    xa: &ArrayBase<impl Data<Elem = F>, Ix2>,
    xb: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Array2<F> {
    check_dims(&[xa.ncols(), xb.ncols()], is_categorical.len(), params);

    let mask = is_categorical.view();
    let lengthscales = params.inverse_squared_lengthscales().view();
    let scale = params.kernel_scale();
    let xb = xb.view();

    let mut k = Array2::zeros((xa.nrows(), xb.nrows()));
    Zip::from(k.rows_mut())
        .and(xa.rows())
        .par_for_each(|mut k_i, a| {
            Zip::from(&mut k_i).and(xb.rows()).for_each(|k_ij, b| {
                *k_ij = scale * matern52(weighted_squared_distance(&mask, &lengthscales, &a, &b));
            });
        });
    k
}

/// Compute both the covariance vector `k(x, xb_i)` of shape `(nb,)` and its jacobian
/// with respect to the components of `x` of shape `(nb, nx)`.
///
/// Categorical components do not contribute to the jacobian as the
/// kernel is piecewise constant along them.
///
/// **Panics** if dimensions are inconsistent (see [`kernel`]).
pub fn kernel_valjac<F: Float>(
    is_categorical: &ArrayBase<impl Data<Elem = bool>, Ix1>,
    params: &KernelParams<F>,
    x: &ArrayBase<impl Data<Elem = F>, Ix1>,
    xb: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> (Array1<F>, Array2<F>) {
    check_dims(&[x.len(), xb.ncols()], is_categorical.len(), params);

    let mask = is_categorical.view();
    let lengthscales = params.inverse_squared_lengthscales().view();
    let scale = params.kernel_scale();
    let x = x.view();

    let mut k = Array1::zeros(xb.nrows());
    let mut jac = Array2::zeros((xb.nrows(), xb.ncols()));
    Zip::from(&mut k)
        .and(jac.rows_mut())
        .and(xb.rows())
        .for_each(|k_i, mut jac_i, b| {
            let d2 = weighted_squared_distance(&mask, &lengthscales, &x, &b);
            *k_i = scale * matern52(d2);
            let dk_dd2 = scale * matern52_derivative(d2);
            Zip::from(&mut jac_i)
                .and(&x)
                .and(&b)
                .and(&mask)
                .and(&lengthscales)
                .for_each(|jac_ij, &x_j, &b_j, &cat, &l_j| {
                    *jac_ij = if cat {
                        F::zero()
                    } else {
                        dk_dd2 * F::cast(2.) * l_j * (x_j - b_j)
                    };
                });
        });
    (k, jac)
}

/// Compute the jacobian of `k(x, xb_i)` with respect to `x` components, see [`kernel_valjac`].
pub fn kernel_jacobian<F: Float>(
    is_categorical: &ArrayBase<impl Data<Elem = bool>, Ix1>,
    params: &KernelParams<F>,
    x: &ArrayBase<impl Data<Elem = F>, Ix1>,
    xb: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Array2<F> {
    kernel_valjac(is_categorical, params, x, xb).1
}
