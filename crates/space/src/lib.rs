/*!
This library describes the search space of a Bayesian optimization problem
as seen by Gaussian Process models: each dimension has a [ScaleType]
(linear, log or categorical), bounds and an optional discretization step.

GP models work on normalized points where continuous dimensions are mapped
to `[0, 1]` while categorical dimensions hold a choice index. The library
provides the normalization helpers and a random sampler of normalized points.

Example:
```
use gpbo_space::{ScaleType, SearchSpace};
use ndarray::array;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

// x0 in [1e-3, 1] (log scale), x1 a choice among 3 categories
let space = SearchSpace::new(
    vec![ScaleType::Log, ScaleType::Categorical],
    &array![[1e-3, 1.], [0., 3.]],
    &array![0., 0.],
)
.expect("valid search space");
let mut rng = Xoshiro256Plus::seed_from_u64(42);
let xs = space.sample_normalized(5, &mut rng);
assert_eq!(xs.dim(), (5, 2));
let x_orig = space.unnormalize_params(&xs);
```
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod errors;
mod sampling;
mod search_space;

pub use errors::*;
pub use sampling::*;
pub use search_space::*;
