use crate::base::AcqfBase;
use crate::criteria::AcquisitionFunction;
use crate::errors::Result;
use crate::parameters::{LogEiParams, LogEiValidParams};
use crate::utils::{logei, logei_batch, logei_with_partials};
use gpbo_gp::KernelParams;
use gpbo_space::SearchSpace;
use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2};
use ndarray_stats::QuantileExt;

/// Logarithm of the expected improvement over the best observed value.
///
/// Working in log space keeps values and gradients informative where the
/// improvement probability underflows.
#[derive(Clone, Debug)]
pub struct LogExpectedImprovement {
    base: AcqfBase,
    max_y: f64,
    stabilizing_noise: f64,
}

/// LogEI acquisition function name
pub const LOG_EI: &str = "LogEI";

impl LogExpectedImprovement {
    /// LogEI given kernel hyperparameters, the search space and observed
    /// data, with default [`LogEiParams`]
    pub fn new(
        kernel_params: KernelParams<f64>,
        search_space: SearchSpace<f64>,
        x: &ArrayBase<impl Data<Elem = f64>, Ix2>,
        y: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    ) -> Result<Self> {
        Self::params().build(kernel_params, search_space, x, y)
    }

    /// Default LogEI parameters to be customized
    pub fn params() -> LogEiParams {
        LogEiParams::new()
    }

    pub(crate) fn from_base(base: AcqfBase, params: &LogEiValidParams) -> Self {
        // observations are finite and not empty
        let max_y = *base.y().max_skipnan();
        LogExpectedImprovement {
            base,
            max_y,
            stabilizing_noise: params.stabilizing_noise(),
        }
    }

    /// Best observed value, the improvement reference
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Variance added to the posterior variance
    pub fn stabilizing_noise(&self) -> f64 {
        self.stabilizing_noise
    }
}

impl AcquisitionFunction for LogExpectedImprovement {
    fn name(&self) -> &'static str {
        LOG_EI
    }

    fn base(&self) -> &AcqfBase {
        &self.base
    }

    fn value(&self, mean: f64, var: f64) -> f64 {
        logei(mean, var.max(0.) + self.stabilizing_noise, self.max_y)
    }

    fn value_with_partials(&self, mean: f64, var: f64) -> (f64, f64, f64) {
        let (val, d_mean, d_var) =
            logei_with_partials(mean, var.max(0.) + self.stabilizing_noise, self.max_y);
        // clamped variance does not move with var
        let d_var = if var > 0. { d_var } else { 0. };
        (val, d_mean, d_var)
    }

    fn values(&self, mean: &Array1<f64>, var: &Array1<f64>) -> Array1<f64> {
        let var = var.mapv(|v| v.max(0.) + self.stabilizing_noise);
        logei_batch(mean, &var, self.max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::tests::{base_1d, base_mixed};
    use approx::assert_abs_diff_eq;
    use finitediff::FiniteDiff;
    use gpbo_space::ScaleType;
    use ndarray::{array, Array};

    fn logei_1d() -> LogExpectedImprovement {
        LogExpectedImprovement::from_base(base_1d(), &LogEiValidParams::default())
    }

    #[test]
    fn test_logei_incumbent() {
        let acqf = logei_1d();
        assert_eq!(acqf.name(), "LogEI");
        assert_eq!(acqf.max_y(), 0.8);

        let at_x = acqf.eval_no_grad(&acqf.base().x().view()).unwrap();
        assert!(at_x.iter().all(|v| v.is_finite()));
        // far from observations the variance makes improvement likely
        let far = acqf.eval_no_grad(&array![[0.7]].view()).unwrap();
        assert!(far[0] > at_x[1]);
        assert!(far[0] > at_x[0] && far[0] > at_x[2]);
        assert!(far[0] > -3.);
    }

    #[test]
    fn test_logei_builder() {
        let kernel_params = KernelParams::new(&array![100.], 1., 1e-6).unwrap();
        let space =
            SearchSpace::new(vec![ScaleType::Linear], &array![[0., 1.]], &array![0.]).unwrap();
        let x = array![[0.1], [0.5], [0.9]];
        let y = array![0.2, 0.8, 0.3];
        let acqf = LogExpectedImprovement::params()
            .stabilizing_noise(1e-9)
            .build(kernel_params.clone(), space.clone(), &x, &y)
            .unwrap();
        assert_eq!(acqf.stabilizing_noise(), 1e-9);

        let acqf = LogExpectedImprovement::new(kernel_params.clone(), space.clone(), &x, &y).unwrap();
        assert_eq!(acqf.stabilizing_noise(), 1e-12);

        assert!(LogExpectedImprovement::params()
            .stabilizing_noise(0.)
            .build(kernel_params, space, &x, &y)
            .is_err());
    }

    #[test]
    fn test_logei_gradient() {
        let acqf = LogExpectedImprovement::from_base(base_mixed(), &LogEiValidParams::default());
        for x in [vec![0.35, 0.55, 1.], vec![0.05, 0.95, 2.], vec![0.8, 0.3, 0.]] {
            let (val, grad) = acqf.eval_with_grad(&Array::from_vec(x.clone()).view()).unwrap();
            let xbatch = Array::from_shape_vec((1, 3), x.clone()).unwrap();
            assert_abs_diff_eq!(val, acqf.eval_no_grad(&xbatch.view()).unwrap()[0], epsilon = 1e-12);

            let f = |x: &Vec<f64>| -> f64 {
                let x = Array::from_shape_vec((1, 3), x.clone()).unwrap();
                acqf.eval_no_grad(&x.view()).unwrap()[0]
            };
            let grad_central = x.central_diff(&f);
            assert_abs_diff_eq!(grad[0], grad_central[0], epsilon = 1e-5);
            assert_abs_diff_eq!(grad[1], grad_central[1], epsilon = 1e-5);
            assert_eq!(grad[2], 0.);
        }
    }

    #[test]
    fn test_logei_negative_variance() {
        let acqf = logei_1d();
        let (val, _, d_var) = acqf.value_with_partials(0.5, -1e-15);
        assert!(val.is_finite());
        assert_eq!(d_var, 0.);
        assert_abs_diff_eq!(acqf.value(0.5, -1e-15), acqf.value(0.5, 0.));
    }

    #[test]
    fn test_logei_values() {
        let acqf = LogExpectedImprovement::from_base(base_mixed(), &LogEiValidParams::default());
        // last two candidates fall on each side of the small improvement branch
        let mean = array![0.1, 0.8, -0.3, 0.75, 0.8 - 30. * 1e-3];
        let var = array![0.5, -1e-15, 0., 1e-4, 1e-6];
        let values = acqf.values(&mean, &var);
        for i in 0..mean.len() {
            assert_abs_diff_eq!(values[i], acqf.value(mean[i], var[i]), epsilon = 1e-12);
        }

        let x = array![[0.35, 0.55, 1.], [0.1, 0.2, 0.], [0.9, 0.4, 2.]];
        let per_point: Array1<f64> = x
            .rows()
            .into_iter()
            .map(|row| acqf.eval_with_grad(&row).unwrap().0)
            .collect();
        assert_abs_diff_eq!(acqf.eval_no_grad(&x.view()).unwrap(), per_point, epsilon = 1e-12);
    }

    #[test]
    fn test_logei_bad_point() {
        let acqf = logei_1d();
        assert!(acqf.eval_no_grad(&array![[0.1, 0.2]].view()).is_err());
        assert!(acqf.eval_with_grad(&array![0.1, 0.2].view()).is_err());
    }
}
