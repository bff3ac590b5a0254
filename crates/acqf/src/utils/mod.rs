//! Closed forms of the acquisition formulas as functions of the posterior
//! mean and variance, with their partial derivatives and batch versions
mod cb_helper;
mod logei_helper;

pub use cb_helper::*;
pub use logei_helper::*;
