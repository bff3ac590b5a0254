use crate::criteria::AcquisitionFunction;
use crate::errors::{AcqfError, Result};
use log::{debug, info};
use ndarray::Array1;
use ndarray_rand::rand::{Rng, SeedableRng};
use ndarray_stats::QuantileExt;
use rand_xoshiro::Xoshiro256Plus;

/// Default number of candidates drawn by the sample-based maximizer
pub const DEFAULT_N_SAMPLES: usize = 2048;

/// Maximize `acqf` by random search: draw `n_samples` normalized candidates
/// from the acquisition function search space, evaluate them all at once
/// and return the best candidate with its acquisition value.
///
/// The first best candidate is returned on ties and NaN values are ignored.
/// The returned value is the maximum over the drawn candidates only.
pub fn optimize_acqf_sample<A, R>(
    acqf: &A,
    n_samples: usize,
    rng: &mut R,
) -> Result<(Array1<f64>, f64)>
where
    A: AcquisitionFunction + ?Sized,
    R: Rng + ?Sized,
{
    if n_samples == 0 {
        return Err(AcqfError::InvalidValueError(
            "at least one sample is required".to_string(),
        ));
    }
    let candidates = acqf.search_space().sample_normalized(n_samples, rng);
    let values = acqf.eval_no_grad(&candidates.view())?;
    if values.iter().all(|v| v.is_nan()) {
        return Err(AcqfError::InvalidValueError(format!(
            "{} is undefined at every sampled candidate",
            acqf.name()
        )));
    }
    let best = values.argmax_skipnan()?;
    debug!(
        "{} best value {} found among {} samples at index {}",
        acqf.name(),
        values[best],
        n_samples,
        best
    );
    Ok((candidates.row(best).to_owned(), values[best]))
}

/// Sample-based maximizer of acquisition functions holding its own
/// random generator, so that successive calls draw different candidates.
pub struct SampleOptimizer<R: Rng> {
    n_samples: usize,
    rng: R,
}

impl Default for SampleOptimizer<Xoshiro256Plus> {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleOptimizer<Xoshiro256Plus> {
    /// Maximizer drawing [`DEFAULT_N_SAMPLES`] candidates with an entropy seeded generator
    pub fn new() -> SampleOptimizer<Xoshiro256Plus> {
        Self::new_with_rng(Xoshiro256Plus::from_entropy())
    }
}

impl<R: Rng> SampleOptimizer<R> {
    /// Maximizer drawing [`DEFAULT_N_SAMPLES`] candidates with the given generator
    pub fn new_with_rng(rng: R) -> Self {
        SampleOptimizer {
            n_samples: DEFAULT_N_SAMPLES,
            rng,
        }
    }

    /// Set the number of candidates drawn at each maximization
    pub fn n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// Set the random generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> SampleOptimizer<R2> {
        SampleOptimizer {
            n_samples: self.n_samples,
            rng,
        }
    }

    /// Maximize `acqf`, see [`optimize_acqf_sample`]
    pub fn maximize<A: AcquisitionFunction + ?Sized>(
        &mut self,
        acqf: &A,
    ) -> Result<(Array1<f64>, f64)> {
        info!(
            "Maximize {} over {} random samples",
            acqf.name(),
            self.n_samples
        );
        optimize_acqf_sample(acqf, self.n_samples, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::tests::{base_1d, base_mixed};
    use crate::criteria::{LogExpectedImprovement, LowerConfidenceBound, UpperConfidenceBound};
    use crate::parameters::{ConfidenceBoundParams, LogEiParams};
    use linfa::ParamGuard;
    use ndarray::array;

    fn acquisition_functions() -> Vec<Box<dyn AcquisitionFunction>> {
        let logei = LogEiParams::new().check().unwrap();
        let cb = ConfidenceBoundParams::new(2.).check().unwrap();
        vec![
            Box::new(LogExpectedImprovement::from_base(base_1d(), &logei)),
            Box::new(LogExpectedImprovement::from_base(base_mixed(), &logei)),
            Box::new(UpperConfidenceBound::from_base(base_mixed(), &cb)),
            Box::new(LowerConfidenceBound::from_base(base_mixed(), &cb)),
        ]
    }

    #[test]
    fn test_single_sample() {
        for acqf in acquisition_functions() {
            let mut rng = Xoshiro256Plus::seed_from_u64(42);
            let (x, val) = optimize_acqf_sample(acqf.as_ref(), 1, &mut rng).unwrap();

            let mut rng = Xoshiro256Plus::seed_from_u64(42);
            let candidate = acqf.search_space().sample_normalized(1, &mut rng);
            assert_eq!(x, candidate.row(0));
            assert_eq!(val, acqf.eval_no_grad(&candidate.view()).unwrap()[0]);
        }
    }

    #[test]
    fn test_best_of_samples() {
        for acqf in acquisition_functions() {
            let mut rng = Xoshiro256Plus::seed_from_u64(0);
            let (x, val) = optimize_acqf_sample(acqf.as_ref(), 200, &mut rng).unwrap();

            let mut rng = Xoshiro256Plus::seed_from_u64(0);
            let candidates = acqf.search_space().sample_normalized(200, &mut rng);
            let values = acqf.eval_no_grad(&candidates.view()).unwrap();
            assert!(values.iter().all(|&v| v <= val));
            let best = values.iter().position(|&v| v == val).unwrap();
            assert_eq!(x, candidates.row(best));
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let acqf = LogExpectedImprovement::from_base(base_mixed(), &LogEiParams::new().check().unwrap());
        let res1 = SampleOptimizer::new_with_rng(Xoshiro256Plus::seed_from_u64(7))
            .n_samples(64)
            .maximize(&acqf)
            .unwrap();
        let res2 = SampleOptimizer::new()
            .with_rng(Xoshiro256Plus::seed_from_u64(7))
            .n_samples(64)
            .maximize(&acqf)
            .unwrap();
        assert_eq!(res1, res2);
        // categorical component is a choice index
        assert_eq!(res1.0[2], res1.0[2].floor());
        assert!(res1.0[2] < 3.);
    }

    #[test]
    fn test_successive_calls_differ() {
        let acqf = LogExpectedImprovement::from_base(base_1d(), &LogEiParams::new().check().unwrap());
        let mut optimizer = SampleOptimizer::new_with_rng(Xoshiro256Plus::seed_from_u64(3)).n_samples(1);
        let (x1, _) = optimizer.maximize(&acqf).unwrap();
        let (x2, _) = optimizer.maximize(&acqf).unwrap();
        assert_ne!(x1, x2);
    }

    fn best_index(values: &Array1<f64>) -> Result<usize> {
        Ok(values.argmax_skipnan()?)
    }

    #[test]
    fn test_argmax_skips_nan() {
        assert_eq!(best_index(&array![0.1, f64::NAN, 0.5, 0.3]).unwrap(), 2);
        assert!(matches!(
            best_index(&Array1::zeros(0)),
            Err(AcqfError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_no_sample() {
        let acqf = LogExpectedImprovement::from_base(base_1d(), &LogEiParams::new().check().unwrap());
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        assert!(optimize_acqf_sample(&acqf, 0, &mut rng).is_err());
        assert_eq!(SampleOptimizer::default().n_samples, DEFAULT_N_SAMPLES);
    }
}
