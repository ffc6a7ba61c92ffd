//! Errors raised by the grid updater.

use thiserror::Error;

/// Result alias used throughout gb-core.
pub type Result<T> = std::result::Result<T, UpdateError>;

/// Errors raised while building a grid or updating beliefs on it.
///
/// Every operation either succeeds completely or returns one of these with
/// no partial output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpdateError {
    /// Malformed input: bad grid bounds, non-positive shapes, inconsistent
    /// counts, mismatched lengths, negative or non-finite weights.
    #[error("invalid argument {field}: {message}")]
    InvalidArgument {
        field: &'static str,
        message: String,
    },

    /// The normalizing constant is zero: no grid point has support under
    /// both the prior and the likelihood.
    #[error("degenerate marginal: prior and likelihood share no support on the {grid_len}-point grid")]
    DegenerateMarginal { grid_len: usize },
}

impl UpdateError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        UpdateError::InvalidArgument {
            field,
            message: message.into(),
        }
    }

    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            UpdateError::InvalidArgument { .. } => 40,
            UpdateError::DegenerateMarginal { .. } => 41,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, UpdateError::DegenerateMarginal { .. })
    }
}

/// Check that a weight vector lines up with the grid it describes.
pub(crate) fn ensure_len(field: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(UpdateError::invalid(
            field,
            format!("expected {} values, got {}", expected, actual),
        ));
    }
    Ok(())
}

/// Check that every weight is finite and non-negative.
pub(crate) fn ensure_weights(field: &'static str, weights: &[f64]) -> Result<()> {
    if let Some((idx, w)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(UpdateError::invalid(
            field,
            format!("weight at index {} must be finite and non-negative, got {}", idx, w),
        ));
    }
    Ok(())
}
