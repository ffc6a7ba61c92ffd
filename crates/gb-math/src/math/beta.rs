//! Beta distribution helpers used for Beta-family priors on a grid.
//!
//! Only the density and the closed-form moments are needed: a grid prior is
//! the density evaluated pointwise and then renormalized.

use serde::{Deserialize, Serialize};

use super::stable::{log1m, log_beta};

/// Shape parameters of a Beta(alpha, beta) distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaParams {
    pub alpha: f64,
    pub beta: f64,
}

impl BetaParams {
    /// Validated constructor. Returns None for non-positive or non-finite shapes.
    pub fn new(alpha: f64, beta: f64) -> Option<Self> {
        if !alpha.is_finite() || !beta.is_finite() || alpha <= 0.0 || beta <= 0.0 {
            return None;
        }
        Some(Self { alpha, beta })
    }

    /// Beta(1, 1).
    pub fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    pub fn mean(&self) -> f64 {
        beta_mean(self.alpha, self.beta)
    }

    pub fn variance(&self) -> f64 {
        beta_var(self.alpha, self.beta)
    }

    /// Pseudo-count weight of the prior, alpha + beta.
    pub fn concentration(&self) -> f64 {
        self.alpha + self.beta
    }
}

/// Mean of Beta(alpha, beta) = alpha / (alpha + beta).
pub fn beta_mean(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    alpha / (alpha + beta)
}

/// Variance of Beta(alpha, beta).
pub fn beta_var(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    let sum = alpha + beta;
    (alpha * beta) / (sum * sum * (sum + 1.0))
}

/// Log of the Beta PDF at x.
///
/// NaN for invalid shapes, NEG_INFINITY outside [0, 1]. At the endpoints the
/// density may be +inf, finite or zero depending on the shape.
pub fn log_beta_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || alpha.is_nan() || beta.is_nan() {
        return f64::NAN;
    }
    if alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if !(0.0..=1.0).contains(&x) {
        return f64::NEG_INFINITY;
    }
    if x == 0.0 {
        return endpoint_log_density(alpha, -log_beta(1.0, beta));
    }
    if x == 1.0 {
        return endpoint_log_density(beta, -log_beta(alpha, 1.0));
    }
    (alpha - 1.0) * x.ln() + (beta - 1.0) * log1m(x) - log_beta(alpha, beta)
}

fn endpoint_log_density(shape: f64, at_one: f64) -> f64 {
    if shape < 1.0 {
        f64::INFINITY
    } else if shape > 1.0 {
        f64::NEG_INFINITY
    } else {
        at_one
    }
}

/// Beta PDF at x.
pub fn beta_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    let log_pdf = log_beta_pdf(x, alpha, beta);
    if log_pdf.is_nan() {
        return f64::NAN;
    }
    log_pdf.exp()
}
