//! Binomial likelihood of the observed data at each grid point.
//!
//! Two normalizations are kept apart on purpose:
//!
//! - [`likelihood_weights`] rescales the likelihood so it sums to 1 over the
//!   grid. That sum depends on how dense the grid is, so the result is for
//!   display next to the prior and posterior only; it is not a probability.
//! - The normalizing constant of Bayes' rule is the marginal likelihood,
//!   computed from the unscaled values by [`crate::posterior::log_evidence`].

use gb_math::binomial::{log_kernel, log_pmf};
use gb_math::normalize_log_weights;
use serde::{Deserialize, Serialize};

use crate::error::{Result, UpdateError};
use crate::grid::Grid;
use crate::observations::Observations;

/// Whether likelihood values carry the binomial coefficient `C(n, k)`.
///
/// The coefficient is constant over the grid and cancels in any posterior,
/// but it is needed when likelihood values are reported on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikelihoodScale {
    /// `θ^k (1-θ)^(n-k)`.
    #[default]
    Kernel,
    /// `C(n, k) θ^k (1-θ)^(n-k)`, the binomial pmf.
    Binomial,
}

/// Unnormalized log-likelihood at each grid point.
///
/// Finite everywhere because grid points are strictly inside (0, 1).
pub fn log_likelihood(grid: &Grid, data: &Observations, scale: LikelihoodScale) -> Vec<f64> {
    let (k, n) = (data.successes(), data.trials());
    grid.iter()
        .map(|theta| match scale {
            LikelihoodScale::Kernel => log_kernel(k, n, theta),
            LikelihoodScale::Binomial => log_pmf(k, n, theta),
        })
        .collect()
}

/// Unnormalized likelihood values in linear space.
///
/// These underflow to 0.0 for large trial counts; use [`log_likelihood`]
/// for anything other than reporting small examples.
pub fn likelihood_values(grid: &Grid, data: &Observations, scale: LikelihoodScale) -> Vec<f64> {
    log_likelihood(grid, data, scale)
        .into_iter()
        .map(f64::exp)
        .collect()
}

/// Likelihood of `successes` in `trials` at each grid point, rescaled to sum
/// to 1 over the grid for display.
pub fn likelihood_weights(grid: &Grid, successes: u64, trials: u64) -> Result<Vec<f64>> {
    let data = Observations::new(successes, trials)?;
    normalized_likelihood(grid, &data)
}

/// [`likelihood_weights`] for already validated observations.
pub fn normalized_likelihood(grid: &Grid, data: &Observations) -> Result<Vec<f64>> {
    let logs = log_likelihood(grid, data, LikelihoodScale::Kernel);
    normalize_log_weights(&logs).ok_or_else(|| {
        UpdateError::invalid(
            "likelihood",
            format!(
                "likelihood of {} successes in {} trials is not finite on the grid",
                data.successes(),
                data.trials()
            ),
        )
    })
}
