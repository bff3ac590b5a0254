use crate::base::AcqfBase;
use crate::criteria::{LogExpectedImprovement, LowerConfidenceBound, UpperConfidenceBound};
use crate::errors::{AcqfError, Result};
use gpbo_gp::KernelParams;
use gpbo_space::SearchSpace;
use linfa::ParamGuard;
use ndarray::{ArrayBase, Data, Ix1, Ix2};
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Default variance added to the posterior variance before computing log-EI
pub const DEFAULT_STABILIZING_NOISE: f64 = 1e-12;

/// Validated [`LogExpectedImprovement`] parameters
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct LogEiValidParams {
    pub(crate) stabilizing_noise: f64,
}

impl Default for LogEiValidParams {
    fn default() -> LogEiValidParams {
        LogEiValidParams {
            stabilizing_noise: DEFAULT_STABILIZING_NOISE,
        }
    }
}

impl LogEiValidParams {
    /// Get variance added to the posterior variance
    pub fn stabilizing_noise(&self) -> f64 {
        self.stabilizing_noise
    }
}

/// The set of hyperparameters of the [`LogExpectedImprovement`] acquisition function
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct LogEiParams(LogEiValidParams);

impl LogEiParams {
    /// Parameters with default stabilizing noise
    pub fn new() -> LogEiParams {
        Self::default()
    }

    /// Set the variance added to the posterior variance to avoid
    /// a division by zero where the GP has no uncertainty left.
    pub fn stabilizing_noise(mut self, stabilizing_noise: f64) -> Self {
        self.0.stabilizing_noise = stabilizing_noise;
        self
    }

    /// Check parameters and build the acquisition function from observed data
    pub fn build(
        self,
        kernel_params: KernelParams<f64>,
        search_space: SearchSpace<f64>,
        x: &ArrayBase<impl Data<Elem = f64>, Ix2>,
        y: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    ) -> Result<LogExpectedImprovement> {
        let params = self.check()?;
        let base = AcqfBase::new(kernel_params, search_space, x, y)?;
        Ok(LogExpectedImprovement::from_base(base, &params))
    }
}

impl From<LogEiValidParams> for LogEiParams {
    fn from(valid: LogEiValidParams) -> Self {
        LogEiParams(valid)
    }
}

impl ParamGuard for LogEiParams {
    type Checked = LogEiValidParams;
    type Error = AcqfError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let noise = self.0.stabilizing_noise;
        if !noise.is_finite() || noise <= 0. {
            return Err(AcqfError::InvalidConfigError(format!(
                "stabilizing noise should be finite and > 0, got {noise}"
            )));
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// Validated confidence bound parameters
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct ConfidenceBoundValidParams {
    pub(crate) beta: f64,
}

impl ConfidenceBoundValidParams {
    /// Get exploration weight
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

/// The set of hyperparameters of the [`UpperConfidenceBound`] and
/// [`LowerConfidenceBound`] acquisition functions
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct ConfidenceBoundParams(ConfidenceBoundValidParams);

impl ConfidenceBoundParams {
    /// Parameters given the exploration weight `beta` applied to the posterior variance
    pub fn new(beta: f64) -> ConfidenceBoundParams {
        ConfidenceBoundParams(ConfidenceBoundValidParams { beta })
    }

    /// Set exploration weight
    pub fn beta(mut self, beta: f64) -> Self {
        self.0.beta = beta;
        self
    }

    /// Check parameters and build an upper confidence bound from observed data
    pub fn build_upper(
        self,
        kernel_params: KernelParams<f64>,
        search_space: SearchSpace<f64>,
        x: &ArrayBase<impl Data<Elem = f64>, Ix2>,
        y: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    ) -> Result<UpperConfidenceBound> {
        let params = self.check()?;
        let base = AcqfBase::new(kernel_params, search_space, x, y)?;
        Ok(UpperConfidenceBound::from_base(base, &params))
    }

    /// Check parameters and build a lower confidence bound from observed data
    pub fn build_lower(
        self,
        kernel_params: KernelParams<f64>,
        search_space: SearchSpace<f64>,
        x: &ArrayBase<impl Data<Elem = f64>, Ix2>,
        y: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    ) -> Result<LowerConfidenceBound> {
        let params = self.check()?;
        let base = AcqfBase::new(kernel_params, search_space, x, y)?;
        Ok(LowerConfidenceBound::from_base(base, &params))
    }
}

impl From<ConfidenceBoundValidParams> for ConfidenceBoundParams {
    fn from(valid: ConfidenceBoundValidParams) -> Self {
        ConfidenceBoundParams(valid)
    }
}

impl ParamGuard for ConfidenceBoundParams {
    type Checked = ConfidenceBoundValidParams;
    type Error = AcqfError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let beta = self.0.beta;
        if !beta.is_finite() || beta < 0. {
            return Err(AcqfError::InvalidConfigError(format!(
                "beta should be finite and >= 0, got {beta}"
            )));
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logei_params() {
        let params = LogEiParams::new().check().unwrap();
        assert_eq!(params.stabilizing_noise(), DEFAULT_STABILIZING_NOISE);
        let params = LogEiParams::new().stabilizing_noise(1e-8).check().unwrap();
        assert_eq!(params.stabilizing_noise(), 1e-8);

        assert!(LogEiParams::new().stabilizing_noise(0.).check().is_err());
        assert!(LogEiParams::new().stabilizing_noise(-1e-6).check().is_err());
        assert!(LogEiParams::new()
            .stabilizing_noise(f64::INFINITY)
            .check()
            .is_err());
    }

    #[test]
    fn test_confidence_bound_params() {
        assert_eq!(ConfidenceBoundParams::new(2.).check().unwrap().beta(), 2.);
        assert_eq!(ConfidenceBoundParams::new(2.).beta(0.).check().unwrap().beta(), 0.);
        assert!(matches!(
            ConfidenceBoundParams::new(-1.).check(),
            Err(AcqfError::InvalidConfigError(_))
        ));
        assert!(ConfidenceBoundParams::new(f64::NAN).check_ref().is_err());
    }
}
