//! Posterior predictive distribution for a future batch of trials.
//!
//! The predictive mixes binomials over the grid points only; it is not a
//! draw from a continuous posterior.

use gb_math::binomial::log_pmf;
use gb_math::log_sum_exp;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Distribution};
use serde::Serialize;

use crate::error::{ensure_len, ensure_weights, Result, UpdateError};
use crate::grid::Grid;
use crate::summary::cumulative;

pub use gb_config::MAX_PREDICTIVE_TRIALS;

fn ensure_predictive_trials(trials: u64) -> Result<()> {
    if trials > MAX_PREDICTIVE_TRIALS {
        return Err(UpdateError::invalid(
            "trials",
            format!("must be at most {}, got {}", MAX_PREDICTIVE_TRIALS, trials),
        ));
    }
    Ok(())
}

/// Categorical distribution over indices with precomputed cumulative weights.
///
/// Construction is O(n); each draw is a binary search. Zero-weight indices
/// are never drawn.
#[derive(Debug, Clone)]
pub struct CategoricalSampler {
    cumulative: Vec<f64>,
}

impl CategoricalSampler {
    pub fn new(weights: &[f64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(UpdateError::invalid("posterior", "must not be empty"));
        }
        ensure_weights("posterior", weights)?;
        let cumulative = cumulative(weights);
        let total = cumulative.last().copied().unwrap_or(0.0);
        if !(total > 0.0 && total.is_finite()) {
            return Err(UpdateError::invalid(
                "posterior",
                "weights must have a positive finite total",
            ));
        }
        Ok(Self { cumulative })
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let total = self.cumulative[self.cumulative.len() - 1];
        let u = rng.random::<f64>() * total;
        let idx = self.cumulative.partition_point(|c| *c <= u);
        // u < total, so idx is in range barring rounding in the last sum
        idx.min(self.cumulative.len() - 1)
    }
}

/// Draw `draw_count` replicated success counts out of `trials`, seeded.
///
/// Each draw picks a grid point according to `posterior` and then a
/// binomial outcome at that point. Identical arguments and seed give
/// identical output.
pub fn posterior_predictive_sample(
    grid: &Grid,
    posterior: &[f64],
    trials: u64,
    draw_count: usize,
    seed: u64,
) -> Result<Vec<u64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    posterior_predictive_sample_with_rng(grid, posterior, trials, draw_count, &mut rng)
}

/// [`posterior_predictive_sample`] with caller-owned random state.
pub fn posterior_predictive_sample_with_rng<R: Rng + ?Sized>(
    grid: &Grid,
    posterior: &[f64],
    trials: u64,
    draw_count: usize,
    rng: &mut R,
) -> Result<Vec<u64>> {
    ensure_len("posterior", grid.len(), posterior.len())?;
    let sampler = CategoricalSampler::new(posterior)?;
    let outcomes = grid
        .iter()
        .map(|theta| {
            Binomial::new(trials, theta).map_err(|e| {
                UpdateError::invalid("grid", format!("cannot sample binomial at {}: {}", theta, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut draws = Vec::with_capacity(draw_count);
    for _ in 0..draw_count {
        let idx = sampler.sample(rng);
        draws.push(outcomes[idx].sample(rng));
    }
    Ok(draws)
}

/// Exact predictive probabilities of `0..=trials` successes.
///
/// `P(k) = Σ_i posterior[i] · Binom(k | trials, grid[i])`, accumulated in
/// log space. `trials` is capped at [`MAX_PREDICTIVE_TRIALS`].
pub fn posterior_predictive_pmf(grid: &Grid, posterior: &[f64], trials: u64) -> Result<Vec<f64>> {
    ensure_predictive_trials(trials)?;
    ensure_len("posterior", grid.len(), posterior.len())?;
    ensure_weights("posterior", posterior)?;
    let total: f64 = posterior.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(UpdateError::invalid("posterior", "weights must not all be zero"));
    }
    let log_w: Vec<f64> = posterior.iter().map(|w| (w / total).ln()).collect();

    let mut terms = vec![0.0; grid.len()];
    Ok((0..=trials)
        .map(|k| {
            for ((term, theta), lw) in terms.iter_mut().zip(grid.iter()).zip(&log_w) {
                *term = lw + log_pmf(k, trials, theta);
            }
            log_sum_exp(&terms).exp()
        })
        .collect())
}

/// Mean of the predictive success count, `trials · E[θ]`.
pub fn predictive_mean(grid: &Grid, posterior: &[f64], trials: u64) -> Result<f64> {
    crate::posterior::posterior_mean(grid, posterior).map(|m| m * trials as f64)
}

/// Simulated and exact predictive distribution for one future batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictiveSummary {
    pub trials: u64,
    pub draws: usize,
    pub seed: u64,
    /// `histogram[k]` counts the draws with `k` successes.
    pub histogram: Vec<u64>,
    /// None when no draws were requested.
    pub sample_mean: Option<f64>,
    pub pmf: Vec<f64>,
    pub mean: f64,
}

/// Seeded draws, their histogram, and the exact pmf for one future batch.
///
/// Fails with `InvalidArgument` before sampling when `trials` exceeds
/// [`MAX_PREDICTIVE_TRIALS`].
pub fn predictive_summary(
    grid: &Grid,
    posterior: &[f64],
    trials: u64,
    draw_count: usize,
    seed: u64,
) -> Result<PredictiveSummary> {
    ensure_predictive_trials(trials)?;
    let draws = posterior_predictive_sample(grid, posterior, trials, draw_count, seed)?;
    let mut histogram = vec![0u64; trials as usize + 1];
    for k in &draws {
        histogram[*k as usize] += 1;
    }
    let sample_mean = if draws.is_empty() {
        None
    } else {
        Some(draws.iter().map(|k| *k as f64).sum::<f64>() / draws.len() as f64)
    };
    Ok(PredictiveSummary {
        trials,
        draws: draw_count,
        seed,
        histogram,
        sample_mean,
        pmf: posterior_predictive_pmf(grid, posterior, trials)?,
        mean: predictive_mean(grid, posterior, trials)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn sampler_never_draws_zero_weight() {
        let sampler = CategoricalSampler::new(&[0.0, 1.0, 0.0, 3.0, 0.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..2_000 {
            let idx = sampler.sample(&mut rng);
            assert!(idx == 1 || idx == 3, "drew {idx}");
        }
    }

    #[test]
    fn sampler_frequencies_track_weights() {
        let sampler = CategoricalSampler::new(&[0.25, 0.75]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let n = 20_000;
        let ones = (0..n).filter(|_| sampler.sample(&mut rng) == 1).count();
        let freq = ones as f64 / n as f64;
        assert!(approx_eq(freq, 0.75, 0.02), "freq {freq}");
    }

    #[test]
    fn sampler_rejects_degenerate_weights() {
        assert!(CategoricalSampler::new(&[]).is_err());
        assert!(CategoricalSampler::new(&[0.0, 0.0]).is_err());
        assert!(CategoricalSampler::new(&[1.0, -1.0]).is_err());
    }

    #[test]
    fn sample_is_deterministic_for_seed() {
        let grid = Grid::interior(10).unwrap();
        let post = vec![0.1; 10];
        let a = posterior_predictive_sample(&grid, &post, 10, 500, 42).unwrap();
        let b = posterior_predictive_sample(&grid, &post, 10, 500, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 500);
        assert!(a.iter().all(|k| *k <= 10));
    }

    #[test]
    fn point_mass_posterior_samples_binomial() {
        let grid = Grid::from_values(vec![0.1, 0.6]).unwrap();
        let draws = posterior_predictive_sample(&grid, &[0.0, 1.0], 50, 4_000, 3).unwrap();
        let mean = draws.iter().sum::<u64>() as f64 / draws.len() as f64;
        assert!(approx_eq(mean, 30.0, 0.5), "mean {mean}");
    }

    #[test]
    fn zero_draws_or_trials() {
        let grid = Grid::interior(3).unwrap();
        let post = [0.2, 0.5, 0.3];
        assert!(posterior_predictive_sample(&grid, &post, 10, 0, 1).unwrap().is_empty());
        let zeros = posterior_predictive_sample(&grid, &post, 0, 5, 1).unwrap();
        assert_eq!(zeros, vec![0; 5]);
    }

    #[test]
    fn sample_rejects_length_mismatch() {
        let grid = Grid::interior(3).unwrap();
        assert!(posterior_predictive_sample(&grid, &[0.5, 0.5], 10, 5, 1).is_err());
    }

    #[test]
    fn pmf_sums_to_one_and_matches_mean() {
        let grid = Grid::interior(10).unwrap();
        let post: Vec<f64> = (1..=10).map(|i| i as f64 / 55.0).collect();
        let pmf = posterior_predictive_pmf(&grid, &post, 12).unwrap();
        assert_eq!(pmf.len(), 13);
        let total: f64 = pmf.iter().sum();
        assert!(approx_eq(total, 1.0, 1e-10));
        let mean: f64 = pmf.iter().enumerate().map(|(k, p)| k as f64 * p).sum();
        assert!(approx_eq(mean, predictive_mean(&grid, &post, 12).unwrap(), 1e-9));
    }

    #[test]
    fn summary_histogram_counts_every_draw() {
        let grid = Grid::interior(10).unwrap();
        let post = vec![0.1; 10];
        let s = predictive_summary(&grid, &post, 10, 1_000, 42).unwrap();
        assert_eq!(s.histogram.len(), 11);
        assert_eq!(s.histogram.iter().sum::<u64>(), 1_000);
        assert!(approx_eq(s.mean, 5.0, 1e-12));
        assert!(approx_eq(s.sample_mean.unwrap(), 5.0, 0.5));
        assert_eq!(s, predictive_summary(&grid, &post, 10, 1_000, 42).unwrap());
        assert!(predictive_summary(&grid, &post, 10, 0, 42).unwrap().sample_mean.is_none());
    }

    #[test]
    fn oversized_batches_are_rejected_before_allocating() {
        let grid = Grid::interior(10).unwrap();
        let post = vec![0.1; 10];
        let err = predictive_summary(&grid, &post, 10_000_000_000, 1, 42).unwrap_err();
        assert!(matches!(err, UpdateError::InvalidArgument { field: "trials", .. }));
        let err = posterior_predictive_pmf(&grid, &post, MAX_PREDICTIVE_TRIALS + 1).unwrap_err();
        assert!(matches!(err, UpdateError::InvalidArgument { field: "trials", .. }));
        assert!(predictive_summary(&grid, &post, u64::MAX, 0, 42).is_err());
    }
}
