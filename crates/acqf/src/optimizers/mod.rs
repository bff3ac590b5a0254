//! Maximizers of acquisition functions over the search space
mod sample_optimizer;

pub use sample_optimizer::*;
