//! Prior weights over the candidate grid.

use gb_math::{log_beta_pdf, normalize, normalize_log_weights, BetaParams};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_len, ensure_weights, Result, UpdateError};
use crate::grid::Grid;

/// Prior family, chosen explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum PriorFamily {
    /// Weight `min(x, 1 - x)`: peaked at 1/2, falling linearly to the edges.
    Triangular,
    /// Equal weight everywhere.
    Uniform,
    /// Beta(alpha, beta) density evaluated at each grid point.
    Beta { alpha: f64, beta: f64 },
}

impl PriorFamily {
    /// Validated Beta family.
    pub fn beta(alpha: f64, beta: f64) -> Result<Self> {
        let params = beta_params(alpha, beta)?;
        Ok(PriorFamily::Beta {
            alpha: params.alpha,
            beta: params.beta,
        })
    }

    /// Unnormalized log weight at `x`.
    fn log_weight(&self, x: f64) -> f64 {
        match *self {
            PriorFamily::Triangular => x.min(1.0 - x).ln(),
            PriorFamily::Uniform => 0.0,
            PriorFamily::Beta { alpha, beta } => log_beta_pdf(x, alpha, beta),
        }
    }
}

impl std::fmt::Display for PriorFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorFamily::Triangular => write!(f, "triangular"),
            PriorFamily::Uniform => write!(f, "uniform"),
            PriorFamily::Beta { alpha, beta } => write!(f, "beta({}, {})", alpha, beta),
        }
    }
}

impl From<gb_config::PriorSpec> for PriorFamily {
    fn from(spec: gb_config::PriorSpec) -> Self {
        match spec {
            gb_config::PriorSpec::Triangular => PriorFamily::Triangular,
            gb_config::PriorSpec::Uniform => PriorFamily::Uniform,
            gb_config::PriorSpec::Beta { alpha, beta } => PriorFamily::Beta { alpha, beta },
        }
    }
}

fn beta_params(alpha: f64, beta: f64) -> Result<BetaParams> {
    BetaParams::new(alpha, beta).ok_or_else(|| {
        UpdateError::invalid(
            "prior.beta",
            format!(
                "shape parameters must be positive and finite, got alpha={} beta={}",
                alpha, beta
            ),
        )
    })
}

/// Normalized prior weights for `family` on `grid`.
///
/// Weights are built in log space and shifted by their maximum before
/// exponentiating, so concentrated Beta priors do not overflow.
pub fn prior_weights(grid: &Grid, family: &PriorFamily) -> Result<Vec<f64>> {
    if let PriorFamily::Beta { alpha, beta } = *family {
        beta_params(alpha, beta)?;
    }
    let log_weights: Vec<f64> = grid.iter().map(|x| family.log_weight(x)).collect();
    normalize_log_weights(&log_weights).ok_or_else(|| {
        UpdateError::invalid(
            "prior",
            format!("{} prior assigns zero weight to every grid point", family),
        )
    })
}

/// Validate and normalize caller-supplied prior weights, e.g. the posterior
/// of an earlier update reused as the next prior.
pub fn normalize_weights(grid: &Grid, weights: &[f64]) -> Result<Vec<f64>> {
    ensure_len("prior", grid.len(), weights.len())?;
    ensure_weights("prior", weights)?;
    normalize(weights)
        .ok_or_else(|| UpdateError::invalid("prior", "weights must not all be zero"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn sum(v: &[f64]) -> f64 {
        v.iter().sum()
    }

    #[test]
    fn triangular_matches_hand_computation() {
        let grid = Grid::from_values(vec![0.25, 0.5, 0.75]).unwrap();
        let w = prior_weights(&grid, &PriorFamily::Triangular).unwrap();
        // raw weights 0.25, 0.5, 0.25
        assert!(approx_eq(w[0], 0.25, 1e-12));
        assert!(approx_eq(w[1], 0.5, 1e-12));
        assert!(approx_eq(w[2], 0.25, 1e-12));
    }

    #[test]
    fn uniform_is_flat() {
        let grid = Grid::interior(8).unwrap();
        let w = prior_weights(&grid, &PriorFamily::Uniform).unwrap();
        assert!(w.iter().all(|x| approx_eq(*x, 0.125, 1e-15)));
    }

    #[test]
    fn beta_follows_density_ratio() {
        let grid = Grid::from_values(vec![0.2, 0.5]).unwrap();
        let w = prior_weights(&grid, &PriorFamily::beta(2.0, 2.0).unwrap()).unwrap();
        // Beta(2,2) density is proportional to x(1-x): 0.16 vs 0.25
        assert!(approx_eq(w[0] / w[1], 0.16 / 0.25, 1e-12));
        assert!(approx_eq(sum(&w), 1.0, 1e-12));
    }

    #[test]
    fn concentrated_beta_does_not_overflow() {
        let grid = Grid::linspace(101, 0.001, 0.999).unwrap();
        let w = prior_weights(&grid, &PriorFamily::beta(5_000.0, 5_000.0).unwrap()).unwrap();
        assert!(approx_eq(sum(&w), 1.0, 1e-9));
        assert!(w.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn beta_rejects_bad_shapes() {
        assert!(PriorFamily::beta(0.0, 1.0).is_err());
        assert!(PriorFamily::beta(1.0, -1.0).is_err());
        let grid = Grid::interior(3).unwrap();
        let raw = PriorFamily::Beta {
            alpha: -2.0,
            beta: 1.0,
        };
        assert!(matches!(
            prior_weights(&grid, &raw),
            Err(UpdateError::InvalidArgument { field: "prior.beta", .. })
        ));
    }

    #[test]
    fn normalize_weights_validates() {
        let grid = Grid::interior(3).unwrap();
        let w = normalize_weights(&grid, &[1.0, 0.0, 3.0]).unwrap();
        assert_eq!(w, vec![0.25, 0.0, 0.75]);
        assert!(normalize_weights(&grid, &[1.0, 1.0]).is_err());
        assert!(normalize_weights(&grid, &[0.0, 0.0, 0.0]).is_err());
        assert!(normalize_weights(&grid, &[1.0, -1.0, 1.0]).is_err());
    }

    #[test]
    fn display_and_config_conversion() {
        assert_eq!(PriorFamily::Triangular.to_string(), "triangular");
        assert_eq!(
            PriorFamily::from(gb_config::PriorSpec::Beta {
                alpha: 10.0,
                beta: 10.0
            })
            .to_string(),
            "beta(10, 10)"
        );
    }

    #[test]
    fn serde_tagging_matches_config() {
        let json = serde_json::to_string(&PriorFamily::Beta {
            alpha: 2.0,
            beta: 2.0,
        })
        .unwrap();
        assert_eq!(json, r#"{"family":"beta","alpha":2.0,"beta":2.0}"#);
    }
}
