use crate::search_space::{ScaleType, SearchSpace};
use linfa::Float;
use ndarray::{Array, Array2, Zip};
use ndarray_rand::{rand::Rng, rand_distr::Uniform, RandomExt};

/// Draw `n` points uniformly in the normalized `search_space`.
///
/// Continuous components are drawn in `[0, 1)`, stepped ones are snapped to
/// their step grid and categorical ones are choice indices drawn uniformly
/// in `0..n_choices`. The result is a (n, nx) matrix.
pub fn sample_normalized_params<F: Float, R: Rng + ?Sized>(
    n: usize,
    search_space: &SearchSpace<F>,
    rng: &mut R,
) -> Array2<F> {
    let nx = search_space.dim();
    let mut params =
        Array::random_using((n, nx), Uniform::new(0., 1.), rng).mapv(|v: f64| F::cast(v));

    Zip::indexed(params.columns_mut()).for_each(|i, mut col| {
        if search_space.scale_types()[i] == ScaleType::Categorical {
            let n_choices = search_space.bounds()[[i, 1]];
            col.mapv_inplace(|v| (v * n_choices).floor());
        }
    });
    search_space.round_normalized_params(&mut params);
    params
}

impl<F: Float> SearchSpace<F> {
    /// Draw `n` normalized points, see [`sample_normalized_params`]
    pub fn sample_normalized<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Array2<F> {
        sample_normalized_params(n, self, rng)
    }
}
