/*!
This library provides the acquisition functions of a Gaussian Process based
Bayesian optimization loop: evaluating Log Expected Improvement, Upper and
Lower Confidence Bounds at candidate points (optionally with gradients) and
picking the best candidate among random samples of the search space.

It re-exports the following sub-packages:
* [gp]: Matérn 5/2 kernel and GP posterior moments given a precomputed
  inverse of the training covariance matrix,
* [space]: search space description, normalization and random sampling,
* [acqf]: acquisition functions and their sample-based maximization.

Example:
```
use gpbo::acqf::{optimize_acqf_sample, AcquisitionFunction, UpperConfidenceBound};
use gpbo::gp::KernelParams;
use gpbo::space::{ScaleType, SearchSpace};
use approx::assert_abs_diff_eq;
use ndarray::{array, Axis};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

// x0 continuous in [-5, 5], x1 a choice among 3 categories
let space = SearchSpace::new(
    vec![ScaleType::Linear, ScaleType::Categorical],
    &array![[-5., 5.], [0., 3.]],
    &array![0., 0.],
)
.expect("valid search space");
let kernel_params = KernelParams::new(&array![4., 1.], 1., 1e-6).expect("valid kernel");

// observed points expressed in the normalized space
let x = array![[0.1, 0.], [0.5, 2.], [0.9, 1.]];
let y = array![-0.5, 0.3, 0.1];
let ucb = UpperConfidenceBound::new(kernel_params, space, &x, &y, 2.).expect("UCB built");

let mut rng = Xoshiro256Plus::seed_from_u64(42);
let (x_next, ucb_next) = optimize_acqf_sample(&ucb, 512, &mut rng).expect("UCB maximized");
assert_eq!(x_next.len(), 2);
let ucb_check = ucb.eval_no_grad(&x_next.view().insert_axis(Axis(0))).expect("UCB value");
assert_abs_diff_eq!(ucb_next, ucb_check[0], epsilon = 1e-10);
```
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub use gpbo_acqf as acqf;
pub use gpbo_gp as gp;
pub use gpbo_space as space;
