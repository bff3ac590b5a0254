use crate::errors::{GpError, Result};
use linfa::Float;

use ndarray::{Array1, ArrayBase, Data, Ix1};
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Hyperparameters of the Matérn 5/2 kernel of a fitted GP.
///
/// Once built, the parameters are immutable: a new instance is expected
/// whenever the GP is fitted again.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(deserialize = "F: Deserialize<'de>"))
)]
pub struct KernelParams<F: Float> {
    /// Inverse squared lengthscales, one per input dimension
    inverse_squared_lengthscales: Array1<F>,
    /// Kernel amplitude, i.e. the prior variance k(x, x)
    kernel_scale: F,
    /// Observation noise variance
    noise_var: F,
}

impl<F: Float> KernelParams<F> {
    /// Constructor given inverse squared lengthscales, kernel scale and noise variance.
    ///
    /// Lengthscales and kernel scale have to be strictly positive,
    /// noise variance has to be positive or zero.
    pub fn new(
        inverse_squared_lengthscales: &ArrayBase<impl Data<Elem = F>, Ix1>,
        kernel_scale: F,
        noise_var: F,
    ) -> Result<Self> {
        if inverse_squared_lengthscales.is_empty() {
            return Err(GpError::InvalidValueError(
                "at least one lengthscale is required".to_string(),
            ));
        }
        if inverse_squared_lengthscales
            .iter()
            .any(|&v| !v.is_finite() || v <= F::zero())
        {
            return Err(GpError::InvalidValueError(format!(
                "inverse squared lengthscales should be finite and > 0, got {}",
                inverse_squared_lengthscales
            )));
        }
        if !kernel_scale.is_finite() || kernel_scale <= F::zero() {
            return Err(GpError::InvalidValueError(format!(
                "kernel scale should be finite and > 0, got {}",
                kernel_scale
            )));
        }
        if !noise_var.is_finite() || noise_var < F::zero() {
            return Err(GpError::InvalidValueError(format!(
                "noise variance should be finite and >= 0, got {}",
                noise_var
            )));
        }
        Ok(KernelParams {
            inverse_squared_lengthscales: inverse_squared_lengthscales.to_owned(),
            kernel_scale,
            noise_var,
        })
    }

    /// Get inverse squared lengthscales
    pub fn inverse_squared_lengthscales(&self) -> &Array1<F> {
        &self.inverse_squared_lengthscales
    }

    /// Get kernel scale
    pub fn kernel_scale(&self) -> F {
        self.kernel_scale
    }

    /// Get observation noise variance
    pub fn noise_var(&self) -> F {
        self.noise_var
    }

    /// Number of input dimensions the kernel is defined on
    pub fn dim(&self) -> usize {
        self.inverse_squared_lengthscales.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_kernel_params() {
        let params = KernelParams::new(&array![1., 4.], 2., 1e-6).expect("valid params");
        assert_eq!(params.dim(), 2);
        assert_eq!(params.kernel_scale(), 2.);
        assert_eq!(params.noise_var(), 1e-6);
    }

    #[test]
    fn test_invalid_kernel_params() {
        assert!(KernelParams::new(&array![1., 0.], 1., 0.).is_err());
        assert!(KernelParams::<f64>::new(&Array1::zeros(0), 1., 0.).is_err());
        assert!(KernelParams::new(&array![1.], -1., 0.).is_err());
        assert!(KernelParams::new(&array![1.], 1., -1e-3).is_err());
        assert!(KernelParams::new(&array![f64::NAN], 1., 0.).is_err());
    }
}
