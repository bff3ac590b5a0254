use crate::base::AcqfBase;
use crate::criteria::AcquisitionFunction;
use crate::errors::Result;
use crate::parameters::{ConfidenceBoundParams, ConfidenceBoundValidParams};
use crate::utils::{lcb, lcb_batch, lcb_with_partials, ucb, ucb_batch, ucb_with_partials};
use gpbo_gp::KernelParams;
use gpbo_space::SearchSpace;
use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2};

/// UCB acquisition function name
pub const UCB: &str = "UCB";
/// LCB acquisition function name
pub const LCB: &str = "LCB";

/// Upper confidence bound `mean + sqrt(beta * var)`: optimistic
/// criterion trading off mean against uncertainty with `beta`
#[derive(Clone, Debug)]
pub struct UpperConfidenceBound {
    base: AcqfBase,
    beta: f64,
}

impl UpperConfidenceBound {
    /// UCB given kernel hyperparameters, the search space, observed data
    /// and the exploration weight `beta >= 0`
    pub fn new(
        kernel_params: KernelParams<f64>,
        search_space: SearchSpace<f64>,
        x: &ArrayBase<impl Data<Elem = f64>, Ix2>,
        y: &ArrayBase<impl Data<Elem = f64>, Ix1>,
        beta: f64,
    ) -> Result<Self> {
        Self::params(beta).build_upper(kernel_params, search_space, x, y)
    }

    /// Parameters to be customized
    pub fn params(beta: f64) -> ConfidenceBoundParams {
        ConfidenceBoundParams::new(beta)
    }

    pub(crate) fn from_base(base: AcqfBase, params: &ConfidenceBoundValidParams) -> Self {
        UpperConfidenceBound {
            base,
            beta: params.beta(),
        }
    }

    /// Exploration weight
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl AcquisitionFunction for UpperConfidenceBound {
    fn name(&self) -> &'static str {
        UCB
    }

    fn base(&self) -> &AcqfBase {
        &self.base
    }

    fn value(&self, mean: f64, var: f64) -> f64 {
        ucb(mean, var.max(0.), self.beta)
    }

    fn value_with_partials(&self, mean: f64, var: f64) -> (f64, f64, f64) {
        ucb_with_partials(mean, var.max(0.), self.beta)
    }

    fn values(&self, mean: &Array1<f64>, var: &Array1<f64>) -> Array1<f64> {
        ucb_batch(mean, &var.mapv(|v| v.max(0.)), self.beta)
    }
}

/// Lower confidence bound `mean - sqrt(beta * var)`: pessimistic
/// counterpart of [`UpperConfidenceBound`]
#[derive(Clone, Debug)]
pub struct LowerConfidenceBound {
    base: AcqfBase,
    beta: f64,
}

impl LowerConfidenceBound {
    /// LCB given kernel hyperparameters, the search space, observed data
    /// and the exploration weight `beta >= 0`
    pub fn new(
        kernel_params: KernelParams<f64>,
        search_space: SearchSpace<f64>,
        x: &ArrayBase<impl Data<Elem = f64>, Ix2>,
        y: &ArrayBase<impl Data<Elem = f64>, Ix1>,
        beta: f64,
    ) -> Result<Self> {
        Self::params(beta).build_lower(kernel_params, search_space, x, y)
    }

    /// Parameters to be customized
    pub fn params(beta: f64) -> ConfidenceBoundParams {
        ConfidenceBoundParams::new(beta)
    }

    pub(crate) fn from_base(base: AcqfBase, params: &ConfidenceBoundValidParams) -> Self {
        LowerConfidenceBound {
            base,
            beta: params.beta(),
        }
    }

    /// Exploration weight
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl AcquisitionFunction for LowerConfidenceBound {
    fn name(&self) -> &'static str {
        LCB
    }

    fn base(&self) -> &AcqfBase {
        &self.base
    }

    fn value(&self, mean: f64, var: f64) -> f64 {
        lcb(mean, var.max(0.), self.beta)
    }

    fn value_with_partials(&self, mean: f64, var: f64) -> (f64, f64, f64) {
        lcb_with_partials(mean, var.max(0.), self.beta)
    }

    fn values(&self, mean: &Array1<f64>, var: &Array1<f64>) -> Array1<f64> {
        lcb_batch(mean, &var.mapv(|v| v.max(0.)), self.beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::tests::{base_1d, base_mixed};
    use crate::errors::AcqfError;
    use approx::assert_abs_diff_eq;
    use finitediff::FiniteDiff;
    use gpbo_space::ScaleType;
    use ndarray::{array, Array};

    fn cb_params(beta: f64) -> ConfidenceBoundValidParams {
        ConfidenceBoundValidParams { beta }
    }

    #[test]
    fn test_zero_beta_is_posterior_mean() {
        let ucb = UpperConfidenceBound::from_base(base_1d(), &cb_params(0.));
        let lcb = LowerConfidenceBound::from_base(base_1d(), &cb_params(0.));
        let x = Array1::linspace(0., 1., 11).insert_axis(ndarray::Axis(1));
        let (mean, _) = ucb.base().posterior_moments(&x.view()).unwrap();
        assert_eq!(ucb.eval_no_grad(&x.view()).unwrap(), mean);
        assert_eq!(lcb.eval_no_grad(&x.view()).unwrap(), mean);
    }

    #[test]
    fn test_bounds_gap() {
        let beta = 2.;
        let ucb = UpperConfidenceBound::from_base(base_mixed(), &cb_params(beta));
        let lcb = LowerConfidenceBound::from_base(base_mixed(), &cb_params(beta));
        let x = array![[0.35, 0.55, 1.], [0.9, 0.1, 2.], [0.5, 0.9, 1.]];
        let (_, var) = ucb.base().posterior_moments(&x.view()).unwrap();
        let gap = ucb.eval_no_grad(&x.view()).unwrap() - lcb.eval_no_grad(&x.view()).unwrap();
        assert_abs_diff_eq!(
            gap,
            var.mapv(|v| 2. * (beta * v.max(0.)).sqrt()),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_confidence_bound_values() {
        let acqfs: Vec<Box<dyn AcquisitionFunction>> = vec![
            Box::new(UpperConfidenceBound::from_base(base_mixed(), &cb_params(2.))),
            Box::new(LowerConfidenceBound::from_base(base_mixed(), &cb_params(2.))),
        ];
        let mean = array![0.1, 0.8, -0.3, 0.75];
        let var = array![0.5, -1e-15, 0., 1e-4];
        for acqf in acqfs.iter() {
            let values = acqf.values(&mean, &var);
            for i in 0..mean.len() {
                assert_abs_diff_eq!(values[i], acqf.value(mean[i], var[i]), epsilon = 1e-15);
            }
            // clamped variance leaves the posterior mean
            assert_eq!(values[1], 0.8);
        }
    }

    #[test]
    fn test_confidence_bound_gradients() {
        let acqfs: Vec<Box<dyn AcquisitionFunction>> = vec![
            Box::new(UpperConfidenceBound::from_base(base_mixed(), &cb_params(1.5))),
            Box::new(LowerConfidenceBound::from_base(base_mixed(), &cb_params(1.5))),
            Box::new(UpperConfidenceBound::from_base(base_mixed(), &cb_params(0.))),
        ];
        for acqf in acqfs.iter() {
            for x in [vec![0.35, 0.55, 1.], vec![0.05, 0.95, 2.]] {
                let (val, grad) = acqf
                    .eval_with_grad(&Array::from_vec(x.clone()).view())
                    .unwrap();
                let f = |x: &Vec<f64>| -> f64 {
                    let x = Array::from_shape_vec((1, 3), x.clone()).unwrap();
                    acqf.eval_no_grad(&x.view()).unwrap()[0]
                };
                assert_abs_diff_eq!(val, f(&x), epsilon = 1e-12);
                let grad_central = x.central_diff(&f);
                assert_abs_diff_eq!(grad[0], grad_central[0], epsilon = 1e-6);
                assert_abs_diff_eq!(grad[1], grad_central[1], epsilon = 1e-6);
                assert_eq!(grad[2], 0.);
            }
        }
    }

    #[test]
    fn test_negative_beta() {
        let kernel_params = KernelParams::new(&array![10.], 1., 1e-6).unwrap();
        let space =
            SearchSpace::new(vec![ScaleType::Linear], &array![[0., 1.]], &array![0.]).unwrap();
        let x = array![[0.1], [0.5]];
        let y = array![0.2, 0.8];
        let res = UpperConfidenceBound::new(kernel_params.clone(), space.clone(), &x, &y, -1.);
        assert!(matches!(res, Err(AcqfError::InvalidConfigError(_))));
        let res = LowerConfidenceBound::new(kernel_params.clone(), space.clone(), &x, &y, -0.1);
        assert!(matches!(res, Err(AcqfError::InvalidConfigError(_))));

        let ucb = UpperConfidenceBound::new(kernel_params, space, &x, &y, 3.).unwrap();
        assert_eq!(ucb.beta(), 3.);
        assert_eq!(ucb.name(), "UCB");
    }
}
