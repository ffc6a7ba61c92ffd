//! Grid Bayes Core Library
//!
//! Discretized Bayesian updating of an unknown success probability:
//! - Candidate grids strictly inside (0, 1)
//! - Triangular, uniform and Beta prior weights
//! - Binomial likelihood computed in log space
//! - Posterior, posterior mean, marginal likelihood and summaries
//! - Seeded posterior predictive sampling
//!
//! The binary entry point is in `main.rs`.

pub mod analysis;
pub mod error;
pub mod exit_codes;
pub mod grid;
pub mod likelihood;
pub mod logging;
pub mod observations;
pub mod posterior;
pub mod predictive;
pub mod prior;
pub mod summary;

pub use analysis::{compare_priors, Analysis, AnalysisRow};
pub use error::{Result, UpdateError};
pub use grid::{build_grid, Grid};
pub use likelihood::{likelihood_values, likelihood_weights, log_likelihood, LikelihoodScale};
pub use observations::Observations;
pub use posterior::{log_evidence, posterior, posterior_mean, update_log_domain};
pub use predictive::{
    posterior_predictive_pmf, posterior_predictive_sample, posterior_predictive_sample_with_rng,
    predictive_mean, predictive_summary, CategoricalSampler, PredictiveSummary,
    MAX_PREDICTIVE_TRIALS,
};
pub use prior::{normalize_weights, prior_weights, PriorFamily};
pub use summary::{credible_interval, summarize, CredibleInterval, PosteriorSummary};
