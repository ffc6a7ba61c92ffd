//! Numerical primitives for grid-based Bayesian updating.

pub mod math;

pub use math::stable::*;
pub use math::beta::*;
pub use math::binomial;
pub use math::normalize::*;
