//! One complete, independent grid analysis.
//!
//! An [`Analysis`] owns the four aligned sequences (grid, prior, likelihood,
//! posterior) plus the derived summaries. It is built from explicit
//! arguments only; nothing is shared between analyses.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::grid::Grid;
use crate::likelihood::{log_likelihood, normalized_likelihood, LikelihoodScale};
use crate::observations::Observations;
use crate::posterior::{log_evidence, posterior_mean, update_log_domain};
use crate::prior::{normalize_weights, prior_weights, PriorFamily};
use crate::summary::{summarize, PosteriorSummary, DEFAULT_CREDIBLE_LEVEL};

/// Result of updating a prior on a grid with one batch of observations.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Prior family, or None when the prior was supplied as raw weights.
    pub prior_family: Option<PriorFamily>,
    pub data: Observations,
    pub grid: Grid,
    pub prior: Vec<f64>,
    /// Likelihood rescaled to sum to 1 over the grid (display only).
    pub likelihood: Vec<f64>,
    pub posterior: Vec<f64>,
    pub posterior_mean: f64,
    /// Log marginal likelihood of the data under the grid prior.
    pub log_evidence: f64,
    pub summary: PosteriorSummary,
}

/// One row of the prior / likelihood / posterior table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisRow {
    pub theta: f64,
    pub prior: f64,
    pub likelihood: f64,
    pub posterior: f64,
}

impl Analysis {
    /// Update a named prior family with `data`.
    pub fn run(grid: &Grid, family: PriorFamily, data: Observations) -> Result<Self> {
        let prior = prior_weights(grid, &family)?;
        debug!(
            target: "gb_core::analysis",
            prior = %family,
            points = grid.len(),
            successes = data.successes(),
            trials = data.trials(),
            "prior built"
        );
        Self::from_normalized_prior(grid, Some(family), prior, data)
    }

    /// Update arbitrary prior weights with `data`.
    pub fn with_prior_weights(grid: &Grid, prior: &[f64], data: Observations) -> Result<Self> {
        let prior = normalize_weights(grid, prior)?;
        Self::from_normalized_prior(grid, None, prior, data)
    }

    /// Treat this posterior as the prior for a further batch of trials.
    ///
    /// Because the binomial likelihood factorizes over batches, chaining
    /// updates ends at the same posterior as one update on the pooled data.
    pub fn then_observe(&self, more: Observations) -> Result<Self> {
        Self::from_normalized_prior(&self.grid, None, self.posterior.clone(), more)
    }

    fn from_normalized_prior(
        grid: &Grid,
        prior_family: Option<PriorFamily>,
        prior: Vec<f64>,
        data: Observations,
    ) -> Result<Self> {
        let likelihood = normalized_likelihood(grid, &data)?;
        let log_lik = log_likelihood(grid, &data, LikelihoodScale::Kernel);
        let posterior = update_log_domain(&prior, &log_lik)?;
        let mean = posterior_mean(grid, &posterior)?;
        let evidence = log_evidence(grid, &prior, &data)?;
        let summary = summarize(grid, &posterior, DEFAULT_CREDIBLE_LEVEL)?;

        debug!(
            target: "gb_core::analysis",
            posterior_mean = mean,
            log_evidence = evidence,
            map = summary.map,
            "posterior computed"
        );

        Ok(Self {
            prior_family,
            data,
            grid: grid.clone(),
            prior,
            likelihood,
            posterior,
            posterior_mean: mean,
            log_evidence: evidence,
            summary,
        })
    }

    /// Table rows, one per grid point.
    pub fn rows(&self) -> impl Iterator<Item = AnalysisRow> + '_ {
        self.grid
            .iter()
            .zip(&self.prior)
            .zip(&self.likelihood)
            .zip(&self.posterior)
            .map(|(((theta, p), l), q)| AnalysisRow {
                theta,
                prior: *p,
                likelihood: *l,
                posterior: *q,
            })
    }

    /// Distance of the posterior mean from the raw success proportion.
    pub fn shrinkage(&self) -> Option<f64> {
        self.data
            .proportion()
            .map(|p| (self.posterior_mean - p).abs())
    }
}

/// Update several priors on the same grid and data, one independent
/// analysis each, in the order given.
pub fn compare_priors(
    grid: &Grid,
    families: &[PriorFamily],
    data: Observations,
) -> Result<Vec<Analysis>> {
    families
        .iter()
        .map(|family| Analysis::run(grid, *family, data))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn kicks() -> Observations {
        Observations::new(6, 10).unwrap()
    }

    #[test]
    fn sequences_are_aligned_and_normalized() {
        let grid = Grid::interior(10).unwrap();
        let a = Analysis::run(&grid, PriorFamily::Triangular, kicks()).unwrap();
        for seq in [&a.prior, &a.likelihood, &a.posterior] {
            assert_eq!(seq.len(), 10);
            assert!(approx_eq(seq.iter().sum::<f64>(), 1.0, 1e-12));
        }
        assert_eq!(a.rows().count(), 10);
        assert_eq!(a.prior_family, Some(PriorFamily::Triangular));
    }

    #[test]
    fn triangular_mean_between_prior_center_and_data() {
        let grid = Grid::interior(10).unwrap();
        let a = Analysis::run(&grid, PriorFamily::Triangular, kicks()).unwrap();
        assert!(a.posterior_mean > 0.5 && a.posterior_mean < 0.6, "{}", a.posterior_mean);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let grid = Grid::interior(10).unwrap();
        let family = PriorFamily::beta(2.0, 2.0).unwrap();
        let a = Analysis::run(&grid, family, kicks()).unwrap();
        let b = Analysis::run(&grid, family, kicks()).unwrap();
        assert_eq!(a.posterior, b.posterior);
        assert_eq!(a.posterior_mean, b.posterior_mean);
    }

    #[test]
    fn chained_update_matches_pooled_update() {
        let grid = Grid::interior(25).unwrap();
        let first = Observations::new(6, 10).unwrap();
        let second = Observations::new(11, 15).unwrap();
        let chained = Analysis::run(&grid, PriorFamily::Triangular, first)
            .unwrap()
            .then_observe(second)
            .unwrap();
        let pooled = Analysis::run(
            &grid,
            PriorFamily::Triangular,
            first.combine(&second).unwrap(),
        )
        .unwrap();
        for (a, b) in chained.posterior.iter().zip(&pooled.posterior) {
            assert!(approx_eq(*a, *b, 1e-12));
        }
        assert!(chained.prior_family.is_none());
    }

    #[test]
    fn raw_prior_weights_with_zero_support() {
        let grid = Grid::interior(4).unwrap();
        let a = Analysis::with_prior_weights(&grid, &[0.0, 1.0, 1.0, 0.0], kicks()).unwrap();
        assert_eq!(a.posterior[0], 0.0);
        assert_eq!(a.posterior[3], 0.0);
        assert!(approx_eq(a.posterior[1] + a.posterior[2], 1.0, 1e-12));
    }

    #[test]
    fn compare_keeps_order() {
        let grid = Grid::interior(10).unwrap();
        let families = [
            PriorFamily::Triangular,
            PriorFamily::beta(10.0, 10.0).unwrap(),
            PriorFamily::beta(2.0, 2.0).unwrap(),
        ];
        let results = compare_priors(&grid, &families, kicks()).unwrap();
        assert_eq!(results.len(), 3);
        for (r, f) in results.iter().zip(&families) {
            assert_eq!(r.prior_family.as_ref(), Some(f));
        }
        assert!(results[2].shrinkage().unwrap() < results[1].shrinkage().unwrap());
    }

    #[test]
    fn serializes_grid_as_array() {
        let grid = Grid::interior(2).unwrap();
        let a = Analysis::run(&grid, PriorFamily::Uniform, kicks()).unwrap();
        let value = serde_json::to_value(&a).unwrap();
        assert!(value["grid"].is_array());
        assert_eq!(value["prior_family"]["family"], "uniform");
        assert_eq!(value["data"]["successes"], 6);
    }
}
