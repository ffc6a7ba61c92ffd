//! Point and interval summaries of a grid posterior.

use serde::Serialize;

use crate::error::{ensure_len, ensure_weights, Result, UpdateError};
use crate::grid::Grid;
use crate::posterior::posterior_mean;

/// Credible level used when a caller does not pick one.
pub const DEFAULT_CREDIBLE_LEVEL: f64 = 0.95;

/// Running sums of `weights`.
pub fn cumulative(weights: &[f64]) -> Vec<f64> {
    weights
        .iter()
        .scan(0.0, |acc, w| {
            *acc += w;
            Some(*acc)
        })
        .collect()
}

/// Posterior variance `Σ w_i (x_i - mean)^2`.
pub fn posterior_variance(grid: &Grid, posterior: &[f64]) -> Result<f64> {
    let mean = posterior_mean(grid, posterior)?;
    Ok(grid
        .iter()
        .zip(posterior)
        .map(|(x, w)| w * (x - mean).powi(2))
        .sum())
}

pub fn posterior_sd(grid: &Grid, posterior: &[f64]) -> Result<f64> {
    posterior_variance(grid, posterior).map(f64::sqrt)
}

/// Index of the most probable grid point. Ties go to the lowest index.
pub fn map_index(posterior: &[f64]) -> Result<usize> {
    if posterior.is_empty() {
        return Err(UpdateError::invalid("posterior", "must not be empty"));
    }
    ensure_weights("posterior", posterior)?;
    let mut best = 0;
    for (idx, w) in posterior.iter().enumerate().skip(1) {
        if *w > posterior[best] {
            best = idx;
        }
    }
    Ok(best)
}

/// Grid value with the highest posterior weight.
pub fn map_estimate(grid: &Grid, posterior: &[f64]) -> Result<f64> {
    ensure_len("posterior", grid.len(), posterior.len())?;
    Ok(grid.points()[map_index(posterior)?])
}

/// Equal-tailed interval on the discrete posterior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CredibleInterval {
    pub level: f64,
    pub lower: f64,
    pub upper: f64,
    /// Posterior mass actually covered, at least `level` up to rounding.
    pub mass: f64,
}

/// Smallest grid points at which the posterior CDF reaches `(1-level)/2`
/// and `1 - (1-level)/2`.
///
/// On a coarse grid the covered mass exceeds `level`; it is reported in
/// [`CredibleInterval::mass`].
pub fn credible_interval(grid: &Grid, posterior: &[f64], level: f64) -> Result<CredibleInterval> {
    if !(level > 0.0 && level < 1.0) {
        return Err(UpdateError::invalid(
            "level",
            format!("must be in (0, 1), got {}", level),
        ));
    }
    ensure_len("posterior", grid.len(), posterior.len())?;
    ensure_weights("posterior", posterior)?;

    let cdf = cumulative(posterior);
    let total = cdf.last().copied().unwrap_or(0.0);
    if total <= 0.0 {
        return Err(UpdateError::invalid("posterior", "weights must not all be zero"));
    }
    // tolerate rounding in the running sum
    let eps = 1e-12 * total;
    let tail = (1.0 - level) / 2.0 * total;
    let last = grid.len() - 1;
    let lo = cdf
        .iter()
        .position(|c| *c >= tail - eps && *c > 0.0)
        .unwrap_or(last);
    let hi = cdf
        .iter()
        .position(|c| *c >= total - tail - eps)
        .unwrap_or(last)
        .max(lo);
    let mass = posterior[lo..=hi].iter().sum::<f64>() / total;

    Ok(CredibleInterval {
        level,
        lower: grid.points()[lo],
        upper: grid.points()[hi],
        mass,
    })
}

/// Mean, spread, mode and interval of a posterior in one place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PosteriorSummary {
    pub mean: f64,
    pub sd: f64,
    pub map: f64,
    pub interval: CredibleInterval,
}

pub fn summarize(grid: &Grid, posterior: &[f64], level: f64) -> Result<PosteriorSummary> {
    Ok(PosteriorSummary {
        mean: posterior_mean(grid, posterior)?,
        sd: posterior_sd(grid, posterior)?,
        map: map_estimate(grid, posterior)?,
        interval: credible_interval(grid, posterior, level)?,
    })
}
