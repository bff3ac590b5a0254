use libm::{erfc, exp, log};
use ndarray::{Array, Array1, ArrayBase, Data, Dimension, Ix1, Zip};

const INV_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
const FRAC_1_SQRT_PI: f64 = 0.5641895835477563; // 1/sqrt(π)
const LOG_SQRT_2PI: f64 = 0.9189385332046727; // log(2π)/2
const SQRT_2PI: f64 = 2.5066282746310002;

/// Standardized improvement below which log-EI is computed with the
/// scaled complementary error function
pub const LOGEI_SMALL_Z_THRESHOLD: f64 = -25.;

/// Above this argument, erfcx is evaluated with its continued fraction
const ERFCX_CF_THRESHOLD: f64 = 10.;
const ERFCX_CF_DEPTH: usize = 60;

fn normal_pdf(u: f64) -> f64 {
    exp(-0.5 * u * u) / SQRT_2PI
}

fn normal_cdf(u: f64) -> f64 {
    0.5 * erfc(-u * INV_SQRT_2)
}

/// Continued fraction of erfc for x >= [`ERFCX_CF_THRESHOLD`]:
///
/// `erfcx(x) = 1 / (sqrt(π) t)` with `t = x + (1/2) / (x + 1 / (x + (3/2) / (x + ...)))`
///
/// Returns `(t, t - x)`, the tail being computed without cancellation.
fn erfcx_continued_fraction(x: f64) -> (f64, f64) {
    let mut t = x;
    for k in (2..=ERFCX_CF_DEPTH).rev() {
        t = x + 0.5 * k as f64 / t;
    }
    let tail = 0.5 / t;
    (x + tail, tail)
}

/// Scaled complementary error function `erfcx(x) = exp(x^2) erfc(x)`
/// which neither overflows nor underflows for large positive `x`.
pub fn erfcx(x: f64) -> f64 {
    if x < ERFCX_CF_THRESHOLD {
        exp(x * x) * erfc(x)
    } else {
        let (t, _) = erfcx_continued_fraction(x);
        FRAC_1_SQRT_PI / t
    }
}

/// `log E[max(0, x + z)]` for `x ~ N(0, 1)`.
///
/// * `z >= -25`: `log(z Φ(z) + φ(z))`
/// * `z < -25`: `-z^2/2 + log((z r + 1) / sqrt(2π))` with `r = sqrt(π/2) erfcx(-z/sqrt(2))`
pub fn standard_logei(z: f64) -> f64 {
    standard_logei_with_derivative(z).0
}

/// Derivative of [`standard_logei`] wrt `z`
pub fn standard_logei_derivative(z: f64) -> f64 {
    standard_logei_with_derivative(z).1
}

/// Compute both [`standard_logei`] and its derivative.
///
/// On the normal branch the derivative is `Φ(z) / (z Φ(z) + φ(z))`.
/// On the small branch, `-z/sqrt(2)` lies in the continued fraction range
/// of erfcx: `z r + 1 = tail / t` and the derivative `r / (z r + 1)`
/// reduces to `1 / (sqrt(2) tail)`.
pub fn standard_logei_with_derivative(z: f64) -> (f64, f64) {
    if z >= LOGEI_SMALL_Z_THRESHOLD {
        let cdf = normal_cdf(z);
        let ei = z * cdf + normal_pdf(z);
        (log(ei), cdf / ei)
    } else {
        let (t, tail) = erfcx_continued_fraction(-z * INV_SQRT_2);
        let val = -0.5 * z * z + log(tail / t) - LOG_SQRT_2PI;
        (val, INV_SQRT_2 / tail)
    }
}

/// `log E[max(0, y - f0)]` for `y ~ N(mean, var)`, `var` being strictly positive
pub fn logei(mean: f64, var: f64, f0: f64) -> f64 {
    let sigma = var.sqrt();
    log(sigma) + standard_logei((mean - f0) / sigma)
}

/// Compute [`logei`] and its partial derivatives wrt `mean` and `var`.
///
/// Returns `(logei, dlogei/dmean, dlogei/dvar)`
pub fn logei_with_partials(mean: f64, var: f64, f0: f64) -> (f64, f64, f64) {
    let sigma = var.sqrt();
    let z = (mean - f0) / sigma;
    let (h, dh) = standard_logei_with_derivative(z);
    let d_mean = dh / sigma;
    let d_var = (1. - z * dh) / (2. * var);
    (log(sigma) + h, d_mean, d_var)
}

/// [`standard_logei`] applied element-wise, each element being routed
/// to its own branch
pub fn standard_logei_batch<D: Dimension>(z: &ArrayBase<impl Data<Elem = f64>, D>) -> Array<f64, D> {
    Zip::from(z).par_map_collect(|&v| standard_logei(v))
}

/// [`logei`] applied element-wise on posterior means and variances
pub fn logei_batch(
    mean: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    var: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    f0: f64,
) -> Array1<f64> {
    let sigma = var.mapv(f64::sqrt);
    let z = (mean - f0) / &sigma;
    sigma.mapv(log) + standard_logei_batch(&z)
}
