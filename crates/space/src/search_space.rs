use crate::errors::{Result, SpaceError};
use linfa::Float;
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1, Ix2, Zip};
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Scale of a search space dimension
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum ScaleType {
    /// Values are normalized linearly between bounds
    Linear,
    /// Values are normalized linearly in log space
    Log,
    /// Values are choice indices `0, 1, ..., n_choices - 1` left as is
    Categorical,
}

/// A search space where each dimension is described by a scale type,
/// bounds and an optional discretization step.
///
/// Points handled by GP models live in the normalized space: continuous
/// dimensions are mapped to `[0, 1]` and categorical ones keep their choice index.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(deserialize = "F: Deserialize<'de>"))
)]
pub struct SearchSpace<F: Float> {
    /// Scale of each dimension
    scale_types: Vec<ScaleType>,
    /// (nx, 2) matrix of \[lower bound, upper bound\] rows.
    /// For categorical dimensions, bounds are \[0, n_choices\]
    bounds: Array2<F>,
    /// Discretization step of each dimension, 0 meaning continuous
    steps: Array1<F>,
}

impl<F: Float> SearchSpace<F> {
    /// Constructor given scale types, a (nx, 2) bounds matrix and (nx,) steps
    ///
    /// ```
    /// use gpbo_space::{ScaleType, SearchSpace};
    /// use ndarray::array;
    ///
    /// let space = SearchSpace::new(
    ///     vec![ScaleType::Linear, ScaleType::Log, ScaleType::Categorical],
    ///     &array![[-5., 5.], [1e-3, 1.], [0., 3.]],
    ///     &array![0., 0., 0.],
    /// )
    /// .expect("valid search space");
    /// assert_eq!(space.dim(), 3);
    /// ```
    pub fn new(
        scale_types: Vec<ScaleType>,
        bounds: &ArrayBase<impl Data<Elem = F>, Ix2>,
        steps: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Result<Self> {
        let dim = scale_types.len();
        if dim == 0 {
            return Err(SpaceError::DimensionError(
                "search space should have at least one dimension".to_string(),
            ));
        }
        if bounds.dim() != (dim, 2) || steps.len() != dim {
            return Err(SpaceError::DimensionError(format!(
                "expected ({dim}, 2) bounds and ({dim},) steps, got {:?} and ({},)",
                bounds.dim(),
                steps.len()
            )));
        }
        for (i, st) in scale_types.iter().enumerate() {
            let (lo, hi, step) = (bounds[[i, 0]], bounds[[i, 1]], steps[i]);
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(SpaceError::InvalidValueError(format!(
                    "dimension {i}: invalid bounds [{lo}, {hi}]"
                )));
            }
            if !step.is_finite() || step < F::zero() {
                return Err(SpaceError::InvalidValueError(format!(
                    "dimension {i}: step should be >= 0, got {step}"
                )));
            }
            match st {
                ScaleType::Log if lo - F::cast(0.5) * step <= F::zero() => {
                    return Err(SpaceError::InvalidValueError(format!(
                        "dimension {i}: log scale requires a positive lower bound, got {lo}"
                    )));
                }
                ScaleType::Categorical if lo != F::zero() || hi < F::one() || hi != hi.floor() => {
                    return Err(SpaceError::InvalidValueError(format!(
                        "dimension {i}: categorical bounds should be [0, n_choices] with an integer n_choices, got [{lo}, {hi}]"
                    )));
                }
                _ => (),
            }
        }
        Ok(SearchSpace {
            scale_types,
            bounds: bounds.to_owned(),
            steps: steps.to_owned(),
        })
    }

    /// Number of dimensions
    pub fn dim(&self) -> usize {
        self.scale_types.len()
    }

    /// Get scale types
    pub fn scale_types(&self) -> &[ScaleType] {
        &self.scale_types
    }

    /// Get bounds as a (nx, 2) matrix
    pub fn bounds(&self) -> &Array2<F> {
        &self.bounds
    }

    /// Get discretization steps
    pub fn steps(&self) -> &Array1<F> {
        &self.steps
    }

    /// Boolean mask flagging categorical dimensions
    pub fn is_categorical(&self) -> Array1<bool> {
        self.scale_types
            .iter()
            .map(|st| *st == ScaleType::Categorical)
            .collect()
    }

    /// Number of choices of the `i`-th dimension if categorical
    pub fn n_choices(&self, i: usize) -> Option<usize> {
        match self.scale_types[i] {
            ScaleType::Categorical => Some(self.bounds[[i, 1]].to_usize().unwrap_or(0)),
            _ => None,
        }
    }

    fn dim_def(&self, i: usize) -> (ScaleType, (F, F), F) {
        (
            self.scale_types[i],
            (self.bounds[[i, 0]], self.bounds[[i, 1]]),
            self.steps[i],
        )
    }

    /// Normalize (n, nx) points given in the original space
    pub fn normalize_params(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array2<F> {
        self.map_columns(x, normalize_one_param)
    }

    /// Map (n, nx) normalized points back to the original space
    pub fn unnormalize_params(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array2<F> {
        self.map_columns(x, unnormalize_one_param)
    }

    fn map_columns(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
        f: fn(F, ScaleType, (F, F), F) -> F,
    ) -> Array2<F> {
        assert_eq!(
            x.ncols(),
            self.dim(),
            "points should have {} components",
            self.dim()
        );
        let mut res = x.to_owned();
        for (i, mut col) in res.columns_mut().into_iter().enumerate() {
            let (st, bounds, step) = self.dim_def(i);
            col.mapv_inplace(|v| f(v, st, bounds, step));
        }
        res
    }

    /// Snap normalized values of stepped dimensions to the step grid
    pub fn round_normalized_params(&self, x: &mut Array2<F>) {
        Zip::indexed(x.columns_mut()).for_each(|i, mut col| {
            let (st, bounds, step) = self.dim_def(i);
            if st != ScaleType::Categorical && step > F::zero() {
                col.mapv_inplace(|v| round_one_normalized_param(v, st, bounds, step));
            }
        });
    }
}

fn widened_bounds<F: Float>(scale_type: ScaleType, bounds: (F, F), step: F) -> (F, F) {
    let half = F::cast(0.5) * step;
    let (lo, hi) = (bounds.0 - half, bounds.1 + half);
    match scale_type {
        ScaleType::Log => (lo.ln(), hi.ln()),
        _ => (lo, hi),
    }
}

/// Normalize a value of a dimension given its scale type, bounds and step.
///
/// Bounds are widened by half a step so that every grid value gets an
/// interval of the same width. Categorical values are returned unchanged
/// and degenerated bounds normalize to 0.5.
pub fn normalize_one_param<F: Float>(
    value: F,
    scale_type: ScaleType,
    bounds: (F, F),
    step: F,
) -> F {
    if scale_type == ScaleType::Categorical {
        return value;
    }
    let (lo, hi) = widened_bounds(scale_type, bounds, step);
    let value = match scale_type {
        ScaleType::Log => value.ln(),
        _ => value,
    };
    if lo == hi {
        return F::cast(0.5);
    }
    (value - lo) / (hi - lo)
}

/// Inverse of [`normalize_one_param`]
pub fn unnormalize_one_param<F: Float>(
    value: F,
    scale_type: ScaleType,
    bounds: (F, F),
    step: F,
) -> F {
    if scale_type == ScaleType::Categorical {
        return value;
    }
    let (lo, hi) = widened_bounds(scale_type, bounds, step);
    let value = value * (hi - lo) + lo;
    match scale_type {
        ScaleType::Log => value.exp(),
        _ => value,
    }
}

/// Round a normalized value to the nearest value of the step grid
/// `bounds.0 + k * step` within bounds, the result being normalized again.
///
/// **Panics** if the dimension is categorical.
pub fn round_one_normalized_param<F: Float>(
    value: F,
    scale_type: ScaleType,
    bounds: (F, F),
    step: F,
) -> F {
    assert!(
        scale_type != ScaleType::Categorical,
        "categorical values cannot be rounded"
    );
    if step == F::zero() {
        return value;
    }
    let value = unnormalize_one_param(value, scale_type, bounds, step);
    let snapped = ((value - bounds.0 + F::cast(0.5) * step) / step).floor() * step + bounds.0;
    let snapped = snapped.max(bounds.0).min(bounds.1);
    normalize_one_param(snapped, scale_type, bounds, step)
}
