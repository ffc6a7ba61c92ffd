//! Bayes' rule on a finite grid.
//!
//! Products of prior and likelihood are formed in log space: two small but
//! nonzero factors can multiply to a subnormal or zero `f64`, and that must
//! not be confused with a point that has no support at all.

use gb_math::binomial::log_pmf;
use gb_math::{log_sum_exp, normalize_log_weights, weighted_sum};

use crate::error::{ensure_len, ensure_weights, Result, UpdateError};
use crate::grid::Grid;
use crate::observations::Observations;

fn ln_weights(weights: &[f64]) -> Vec<f64> {
    // ln(0) = -inf, which keeps zero support absorbing
    weights.iter().map(|w| w.ln()).collect()
}

/// Posterior weights proportional to `prior[i] * likelihood[i]`.
///
/// Both inputs must have the same length and be finite and non-negative;
/// neither needs to be normalized. Returns
/// [`UpdateError::DegenerateMarginal`] when no index has nonzero weight in
/// both.
pub fn posterior(prior: &[f64], likelihood: &[f64]) -> Result<Vec<f64>> {
    if prior.is_empty() {
        return Err(UpdateError::invalid("prior", "must not be empty"));
    }
    ensure_len("likelihood", prior.len(), likelihood.len())?;
    ensure_weights("prior", prior)?;
    ensure_weights("likelihood", likelihood)?;
    combine_log(&ln_weights(prior), &ln_weights(likelihood))
}

/// Posterior from a linear-space prior and a log-space likelihood.
///
/// This is the path used for large trial counts, where the likelihood has no
/// useful linear representation.
pub fn update_log_domain(prior: &[f64], log_likelihood: &[f64]) -> Result<Vec<f64>> {
    if prior.is_empty() {
        return Err(UpdateError::invalid("prior", "must not be empty"));
    }
    ensure_len("likelihood", prior.len(), log_likelihood.len())?;
    ensure_weights("prior", prior)?;
    if let Some(idx) = log_likelihood
        .iter()
        .position(|l| l.is_nan() || *l == f64::INFINITY)
    {
        return Err(UpdateError::invalid(
            "likelihood",
            format!("log weight at index {} is {}", idx, log_likelihood[idx]),
        ));
    }
    combine_log(&ln_weights(prior), log_likelihood)
}

fn combine_log(log_prior: &[f64], log_likelihood: &[f64]) -> Result<Vec<f64>> {
    let joint: Vec<f64> = log_prior
        .iter()
        .zip(log_likelihood)
        .map(|(p, l)| p + l)
        .collect();
    normalize_log_weights(&joint).ok_or(UpdateError::DegenerateMarginal {
        grid_len: joint.len(),
    })
}

/// Posterior mean `Σ grid[i] * posterior[i]`.
pub fn posterior_mean(grid: &Grid, posterior: &[f64]) -> Result<f64> {
    ensure_len("posterior", grid.len(), posterior.len())?;
    Ok(weighted_sum(grid.points(), posterior))
}

/// Log marginal likelihood `log Σ prior[i] · P(k | n, grid[i])`.
///
/// Uses the binomial pmf including `C(n, k)`, so the result is the actual
/// probability of the data under the grid prior. Independent of any display
/// normalization of the likelihood.
pub fn log_evidence(grid: &Grid, prior: &[f64], data: &Observations) -> Result<f64> {
    ensure_len("prior", grid.len(), prior.len())?;
    ensure_weights("prior", prior)?;
    let prior_total: f64 = prior.iter().sum();
    if prior_total <= 0.0 {
        return Err(UpdateError::invalid("prior", "weights must not all be zero"));
    }
    let terms: Vec<f64> = grid
        .iter()
        .zip(prior)
        .map(|(theta, w)| (w / prior_total).ln() + log_pmf(data.successes(), data.trials(), theta))
        .collect();
    let evidence = log_sum_exp(&terms);
    if evidence == f64::NEG_INFINITY {
        return Err(UpdateError::DegenerateMarginal {
            grid_len: grid.len(),
        });
    }
    Ok(evidence)
}
