//! Binomial likelihood terms for k successes in n trials.
//!
//! The kernel `p^k (1-p)^(n-k)` and the full pmf differ only by the constant
//! `C(n, k)`, which cancels in a posterior but matters when a likelihood value
//! is reported on its own. Both are computed in log space: the linear kernel
//! underflows to zero for a few hundred trials once p is near 0 or 1.

use super::stable::{log1m, log_binomial};

/// log of `p^k (1-p)^(n-k)`.
///
/// Uses the `0 * log(0) = 0` convention at the endpoints, so p = 0 with k = 0
/// yields 0 rather than NaN. NaN for p outside [0, 1] or k > n.
pub fn log_kernel(k: u64, n: u64, p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) || k > n {
        return f64::NAN;
    }
    let failures = n - k;
    let success_term = match (k, p) {
        (0, _) => 0.0,
        (_, p) if p == 0.0 => return f64::NEG_INFINITY,
        (k, p) => k as f64 * p.ln(),
    };
    let failure_term = match (failures, p) {
        (0, _) => 0.0,
        (_, p) if p == 1.0 => return f64::NEG_INFINITY,
        (f, p) => f as f64 * log1m(p),
    };
    success_term + failure_term
}

/// log P(X = k) for X ~ Binomial(n, p).
pub fn log_pmf(k: u64, n: u64, p: f64) -> f64 {
    let kernel = log_kernel(k, n, p);
    if kernel.is_nan() || kernel == f64::NEG_INFINITY {
        return kernel;
    }
    log_binomial(n, k) + kernel
}

/// P(X = k) for X ~ Binomial(n, p).
pub fn pmf(k: u64, n: u64, p: f64) -> f64 {
    let log_p = log_pmf(k, n, p);
    if log_p.is_nan() {
        return f64::NAN;
    }
    log_p.exp()
}

/// E[X] = n p.
pub fn mean(n: u64, p: f64) -> f64 {
    n as f64 * p
}

/// Var[X] = n p (1 - p).
pub fn variance(n: u64, p: f64) -> f64 {
    n as f64 * p * (1.0 - p)
}
