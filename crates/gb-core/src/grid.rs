//! Candidate grid of success probabilities.

use serde::Serialize;

use crate::error::{Result, UpdateError};

/// An ordered, finite set of candidate values for an unknown probability.
///
/// Invariants: at least one point, strictly increasing, every point finite
/// and strictly inside (0, 1). Points at exactly 0 or 1 are rejected because
/// the log-likelihood there is -inf for any opposing outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Grid {
    points: Vec<f64>,
}

impl Grid {
    /// `n` evenly spaced points spanning `[lower, upper]`.
    ///
    /// A single point is placed at `lower`. Bounds only a few ULPs apart
    /// cannot hold many distinct points; that fails with `InvalidArgument`
    /// on `grid.points`.
    pub fn linspace(n: usize, lower: f64, upper: f64) -> Result<Self> {
        if n < 1 {
            return Err(UpdateError::invalid("grid.points", "must be at least 1"));
        }
        if !lower.is_finite() || !upper.is_finite() {
            return Err(UpdateError::invalid(
                "grid.bounds",
                format!("bounds must be finite, got [{}, {}]", lower, upper),
            ));
        }
        if lower >= upper {
            return Err(UpdateError::invalid(
                "grid.bounds",
                format!("lower ({}) must be below upper ({})", lower, upper),
            ));
        }
        if lower <= 0.0 || upper >= 1.0 {
            return Err(UpdateError::invalid(
                "grid.bounds",
                format!("bounds must lie in (0, 1), got [{}, {}]", lower, upper),
            ));
        }

        let points = if n == 1 {
            vec![lower]
        } else {
            let step = (upper - lower) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| lower + step * i as f64).collect();
            points[n - 1] = upper;
            if points.windows(2).any(|w| w[0] >= w[1]) {
                return Err(UpdateError::invalid(
                    "grid.points",
                    format!(
                        "bounds [{}, {}] are too close for {} distinct points",
                        lower, upper, n
                    ),
                ));
            }
            points
        };
        Self::from_values(points)
    }

    /// The `n` interior lattice points `i / (n + 1)` for `i = 1..=n`.
    pub fn interior(n: usize) -> Result<Self> {
        if n < 1 {
            return Err(UpdateError::invalid("grid.points", "must be at least 1"));
        }
        let denom = (n + 1) as f64;
        Self::from_values((1..=n).map(|i| i as f64 / denom).collect())
    }

    /// Validate an explicit sequence of candidate values.
    pub fn from_values(points: Vec<f64>) -> Result<Self> {
        if points.is_empty() {
            return Err(UpdateError::invalid("grid", "must contain at least one point"));
        }
        for (idx, &p) in points.iter().enumerate() {
            if !(p.is_finite() && p > 0.0 && p < 1.0) {
                return Err(UpdateError::invalid(
                    "grid",
                    format!("point {} must lie strictly inside (0, 1), got {}", idx, p),
                ));
            }
        }
        if let Some(idx) = points.windows(2).position(|w| w[0] >= w[1]) {
            return Err(UpdateError::invalid(
                "grid",
                format!(
                    "points must be strictly increasing, got {} then {} at index {}",
                    points[idx],
                    points[idx + 1],
                    idx + 1
                ),
            ));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for the `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().copied()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.points
    }
}

impl AsRef<[f64]> for Grid {
    fn as_ref(&self) -> &[f64] {
        &self.points
    }
}

/// Build an evenly spaced grid of `n` points over `[lower, upper]`.
pub fn build_grid(n: usize, lower: f64, upper: f64) -> Result<Grid> {
    Grid::linspace(n, lower, upper)
}

impl TryFrom<&gb_config::GridSpec> for Grid {
    type Error = UpdateError;

    fn try_from(spec: &gb_config::GridSpec) -> Result<Self> {
        match (spec.lower, spec.upper) {
            (Some(lower), Some(upper)) => Grid::linspace(spec.points, lower, upper),
            (None, None) => Grid::interior(spec.points),
            _ => Err(UpdateError::invalid(
                "grid.bounds",
                "lower and upper must be given together",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn linspace_endpoints_and_spacing() {
        let grid = build_grid(5, 0.1, 0.9).unwrap();
        let expected = [0.1, 0.3, 0.5, 0.7, 0.9];
        assert_eq!(grid.len(), 5);
        for (got, want) in grid.iter().zip(expected) {
            assert!(approx_eq(got, want, 1e-12), "{got} != {want}");
        }
        assert_eq!(grid.points()[4], 0.9);
    }

    #[test]
    fn linspace_single_point_is_lower() {
        let grid = build_grid(1, 0.25, 0.75).unwrap();
        assert_eq!(grid.points(), &[0.25]);
    }

    #[test]
    fn linspace_rejects_bounds_too_close_for_n() {
        let upper = 0.5 + 4.0 * f64::EPSILON;
        let err = build_grid(1_000, 0.5, upper).unwrap_err();
        assert!(matches!(err, UpdateError::InvalidArgument { field: "grid.points", .. }));
        assert!(err.to_string().contains("too close"), "{err}");

        let next = f64::from_bits(0.5f64.to_bits() + 1);
        assert_eq!(build_grid(2, 0.5, next).unwrap().points(), &[0.5, next]);
    }

    #[test]
    fn linspace_rejects_bad_arguments() {
        assert!(build_grid(0, 0.1, 0.9).is_err());
        assert!(build_grid(3, 0.5, 0.5).is_err());
        assert!(build_grid(3, 0.7, 0.2).is_err());
        assert!(build_grid(3, 0.0, 0.5).is_err());
        assert!(build_grid(3, 0.5, 1.0).is_err());
        assert!(build_grid(3, f64::NAN, 0.5).is_err());
    }

    #[test]
    fn linspace_penalty_kick_grid_matches_interior() {
        let spaced = build_grid(10, 1.0 / 11.0, 10.0 / 11.0).unwrap();
        let interior = Grid::interior(10).unwrap();
        for (a, b) in spaced.iter().zip(interior.iter()) {
            assert!(approx_eq(a, b, 1e-12));
        }
    }

    #[test]
    fn from_values_rejects_endpoints_and_disorder() {
        let err = Grid::from_values(vec![0.0, 0.5]).unwrap_err();
        assert!(err.to_string().contains("point 0"));
        assert!(Grid::from_values(vec![0.5, 1.0]).is_err());
        assert!(Grid::from_values(vec![0.3, 0.3]).is_err());
        assert!(Grid::from_values(vec![0.4, 0.2]).is_err());
        assert!(Grid::from_values(vec![]).is_err());
        assert!(Grid::from_values(vec![0.001, 0.5, 0.999]).is_ok());
    }

    #[test]
    fn from_config_spec() {
        let spec = gb_config::GridSpec {
            points: 3,
            lower: None,
            upper: None,
        };
        let grid = Grid::try_from(&spec).unwrap();
        assert_eq!(grid.points(), &[0.25, 0.5, 0.75]);

        let half = gb_config::GridSpec {
            points: 3,
            lower: Some(0.2),
            upper: None,
        };
        assert!(Grid::try_from(&half).is_err());
    }

    #[test]
    fn serializes_as_plain_array() {
        let grid = Grid::interior(3).unwrap();
        assert_eq!(serde_json::to_string(&grid).unwrap(), "[0.25,0.5,0.75]");
    }
}
