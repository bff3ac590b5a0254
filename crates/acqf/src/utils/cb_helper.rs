use ndarray::{Array1, ArrayBase, Data, Ix1, Zip};

fn exploration(var: f64, beta: f64) -> f64 {
    (beta * var).sqrt()
}

/// Derivative of `sqrt(beta * var)` wrt `var`, taken as zero where the
/// radicand vanishes
fn exploration_derivative(var: f64, beta: f64) -> f64 {
    let radicand = beta * var;
    if radicand > 0. {
        beta / (2. * radicand.sqrt())
    } else {
        0.
    }
}

/// Upper confidence bound `mean + sqrt(beta * var)`
pub fn ucb(mean: f64, var: f64, beta: f64) -> f64 {
    mean + exploration(var, beta)
}

/// Lower confidence bound `mean - sqrt(beta * var)`
pub fn lcb(mean: f64, var: f64, beta: f64) -> f64 {
    mean - exploration(var, beta)
}

/// Returns `(ucb, ducb/dmean, ducb/dvar)`
pub fn ucb_with_partials(mean: f64, var: f64, beta: f64) -> (f64, f64, f64) {
    (ucb(mean, var, beta), 1., exploration_derivative(var, beta))
}

/// Returns `(lcb, dlcb/dmean, dlcb/dvar)`
pub fn lcb_with_partials(mean: f64, var: f64, beta: f64) -> (f64, f64, f64) {
    (lcb(mean, var, beta), 1., -exploration_derivative(var, beta))
}

/// [`ucb`] applied element-wise on posterior means and variances
pub fn ucb_batch(
    mean: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    var: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    beta: f64,
) -> Array1<f64> {
    Zip::from(mean)
        .and(var)
        .par_map_collect(|&m, &v| ucb(m, v, beta))
}

/// [`lcb`] applied element-wise on posterior means and variances
pub fn lcb_batch(
    mean: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    var: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    beta: f64,
) -> Array1<f64> {
    Zip::from(mean)
        .and(var)
        .par_map_collect(|&m, &v| lcb(m, v, beta))
}
