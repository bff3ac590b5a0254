use gpbo_acqf::{AcquisitionFunction, LogExpectedImprovement, SampleOptimizer, UpperConfidenceBound};
use gpbo_gp::KernelParams;
use gpbo_space::{ScaleType, SearchSpace};
use ndarray::{array, concatenate, Array1, Array2, Axis};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

// A one-dimensional test function to be maximized, x in [0., 25.]
fn neg_xsinx(x: f64) -> f64 {
    -(x - 3.5) * ((x - 3.5) / std::f64::consts::PI).sin()
}

fn main() {
    env_logger::init();

    let space = SearchSpace::new(vec![ScaleType::Linear], &array![[0., 25.]], &array![0.])
        .expect("search space");
    // kernel fitting is out of scope: hyperparameters are given
    let kernel_params = KernelParams::new(&array![20.], 150., 1e-6).expect("kernel params");

    let mut xnorm: Array2<f64> = array![[0.], [0.2], [0.5], [0.8], [1.]];
    let mut y: Array1<f64> = space
        .unnormalize_params(&xnorm)
        .column(0)
        .mapv(neg_xsinx);

    let mut optimizer =
        SampleOptimizer::new_with_rng(Xoshiro256Plus::seed_from_u64(42)).n_samples(1024);
    for i in 0..10 {
        // the cached covariance inverse is built from the current data
        let acqf = LogExpectedImprovement::new(kernel_params.clone(), space.clone(), &xnorm, &y)
            .expect("LogEI");
        let (x_next, logei) = optimizer.maximize(&acqf).expect("LogEI maximization");
        let (_, grad) = acqf
            .eval_with_grad(&x_next.view())
            .expect("LogEI gradient");

        let x_orig = space.unnormalize_params(&x_next.clone().insert_axis(Axis(0)));
        let y_next = neg_xsinx(x_orig[[0, 0]]);
        println!(
            "iter {i}: x = {:.4}, f(x) = {y_next:.4}, LogEI = {logei:.4}, dLogEI/dx = {:.4}",
            x_orig[[0, 0]],
            grad[0]
        );

        xnorm = concatenate![Axis(0), xnorm, x_next.insert_axis(Axis(0))];
        y = concatenate![Axis(0), y, array![y_next]];
    }

    let best = y
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
    let x_best = space.unnormalize_params(&xnorm.row(best.0).insert_axis(Axis(0)));
    println!("Best f(x) = {:.4} at x = {:.4}", best.1, x_best[[0, 0]]);

    let ucb = UpperConfidenceBound::new(kernel_params, space, &xnorm, &y, 4.).expect("UCB");
    let (x_ucb, val) = optimizer.maximize(&ucb).expect("UCB maximization");
    println!("UCB(beta=4) would sample x = {x_ucb} (value {val:.4})");
}
